use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::{
    bounds::Bounds,
    metadata::Tags,
    series::{Series, SeriesList},
};

pub(crate) fn ts(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0)
        .single()
        .expect("valid UTC timestamp")
}

/// Bounds starting at the epoch with `hours` one-hour steps.
pub(crate) fn hourly_bounds(hours: i64) -> Bounds {
    Bounds::new(ts(0), ts(hours * 3600), Duration::hours(1)).expect("valid bounds")
}

/// One hourly series per row, tagged `host=h{i}` plus a shared `job=test`.
pub(crate) fn hourly_list(rows: &[&[f64]]) -> SeriesList {
    let steps = rows.iter().map(|r| r.len()).max().unwrap_or(0).max(1) as i64;
    rows.iter()
        .enumerate()
        .map(|(i, values)| {
            Series::new(values.to_vec(), hourly_bounds(steps))
                .expect("values fit bounds")
                .with_tags(Tags::new().with("job", "test").with("host", format!("h{i}")))
        })
        .collect()
}
