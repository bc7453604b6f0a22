use aero_notify::HumidityTemp;
use chrono::Local;

pub static CHECK: &str = "✔️";
pub static CROSS: &str = "❌";

static DOWN: &str = "↓";
static UP: &str = "↗";
static EQ: &str = "=";

pub fn mark(b: bool) -> &'static str {
    if b {
        CHECK
    } else {
        CROSS
    }
}

fn updown(fst: f64, snd: f64) -> &'static str {
    match fst.partial_cmp(&snd) {
        Some(std::cmp::Ordering::Less) => DOWN,
        Some(std::cmp::Ordering::Greater) => UP,
        Some(std::cmp::Ordering::Equal) => EQ,
        None => "?",
    }
}

pub fn print_report(
    indoor: HumidityTemp,
    outdoor: HumidityTemp,
    should_be_open: bool,
    last_known_open: Option<bool>,
) {
    let now = Local::now().naive_local();
    println!("Time: {}", now.format("%A %Y-%m-%d %I:%M:%S %p"));
    println!(
        "indoor temp: 🏠{} {}🌡️",
        updown(indoor.temp, outdoor.temp),
        indoor.temp
    );
    println!(
        "outdoor temp: 🌳{} {}🌡️",
        updown(outdoor.temp, indoor.temp),
        outdoor.temp
    );
    println!(
        "indoor humidity: 🏠{} {}💧",
        updown(indoor.humidity, outdoor.humidity),
        indoor.humidity
    );
    println!(
        "outdoor humidity: 🌳{} {}💧",
        updown(outdoor.humidity, indoor.humidity),
        outdoor.humidity
    );
    println!("window_should_be_open: 🪟{}", mark(should_be_open));
    match last_known_open {
        Some(is_open) => println!("is_window_open: 🪟{}", mark(is_open)),
        None => println!("window state unknown"),
    }
}
