use chrono::NaiveDateTime;

/// Current local wall-clock time
pub fn now() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}

/// Compact sortable stamp used in exported file names, e.g. `20240131235959`
pub fn file_timestamp(time: &NaiveDateTime) -> String {
    time.format("%Y%m%d%H%M%S").to_string()
}
