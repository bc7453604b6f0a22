/// Outdoor temperature band inside which opening the windows is pleasant.
#[derive(Debug, Clone)]
pub struct Thresholds {
    pub min_temp: f64,
    pub max_temp: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            min_temp: 50.0,
            max_temp: 90.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HumidityTemp {
    pub humidity: f64,
    pub temp: f64,
}

/// Open the windows when the air coming in is drier than the air inside
/// and the outdoor temperature sits strictly inside the comfort band.
pub fn window_should_be_open(
    indoor: HumidityTemp,
    outdoor: HumidityTemp,
    thresholds: &Thresholds,
) -> bool {
    let can_let_in_humidity = outdoor.humidity < indoor.humidity;
    let can_let_in_temperature =
        outdoor.temp > thresholds.min_temp && outdoor.temp < thresholds.max_temp;
    can_let_in_humidity && can_let_in_temperature
}

/// What to tell the user, given the fresh decision and the last believed
/// window state (`None` = unknown or stale).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowAdvice {
    OpenWindows,
    CloseWindows,
    NoChange,
}

pub fn advise(should_be_open: bool, last_known_open: Option<bool>) -> WindowAdvice {
    match (should_be_open, last_known_open) {
        (true, None) | (true, Some(false)) => WindowAdvice::OpenWindows,
        (false, None) | (false, Some(true)) => WindowAdvice::CloseWindows,
        _ => WindowAdvice::NoChange,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(humidity: f64, temp: f64) -> HumidityTemp {
        HumidityTemp { humidity, temp }
    }

    #[test]
    fn test_drier_and_mild_outside_opens_windows() {
        // indoor 55 %rH, outdoor 40 %rH at 65 degF
        assert!(window_should_be_open(
            reading(55.0, 70.0),
            reading(40.0, 65.0),
            &Thresholds::default()
        ));
    }

    #[test]
    fn test_hot_outside_keeps_windows_closed_regardless_of_humidity() {
        assert!(!window_should_be_open(
            reading(55.0, 70.0),
            reading(40.0, 95.0),
            &Thresholds::default()
        ));
    }

    #[test]
    fn test_cold_outside_keeps_windows_closed() {
        assert!(!window_should_be_open(
            reading(55.0, 70.0),
            reading(40.0, 45.0),
            &Thresholds::default()
        ));
    }

    #[test]
    fn test_humid_outside_keeps_windows_closed() {
        assert!(!window_should_be_open(
            reading(55.0, 70.0),
            reading(60.0, 65.0),
            &Thresholds::default()
        ));
    }

    #[test]
    fn test_band_edges_are_exclusive() {
        let thresholds = Thresholds::default();
        assert!(!window_should_be_open(
            reading(55.0, 70.0),
            reading(40.0, 50.0),
            &thresholds
        ));
        assert!(!window_should_be_open(
            reading(55.0, 70.0),
            reading(40.0, 90.0),
            &thresholds
        ));
    }

    #[test]
    fn test_advice_fires_only_on_transitions() {
        assert_eq!(advise(true, None), WindowAdvice::OpenWindows);
        assert_eq!(advise(true, Some(false)), WindowAdvice::OpenWindows);
        assert_eq!(advise(true, Some(true)), WindowAdvice::NoChange);
        assert_eq!(advise(false, None), WindowAdvice::CloseWindows);
        assert_eq!(advise(false, Some(true)), WindowAdvice::CloseWindows);
        assert_eq!(advise(false, Some(false)), WindowAdvice::NoChange);
    }
}
