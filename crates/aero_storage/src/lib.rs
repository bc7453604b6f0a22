pub mod backends;

pub use backends::csv_series::CsvSeriesStore;
pub use backends::json_file::JsonSnapshotStore;
pub use backends::state_file::StateFile;

pub mod prelude {
    pub use super::backends::csv_series::CsvSeriesStore;
    pub use super::backends::json_file::JsonSnapshotStore;
    pub use super::backends::state_file::StateFile;
}
