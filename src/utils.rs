use chrono::{DateTime, TimeZone, Utc};

/// Sidecar injected by the service mesh; always named explicitly in file names.
pub const MESH_PROXY_CONTAINER: &str = "istio-proxy";

/// Second-granularity stamp used in file names, e.g. `20240131_235959`.
pub fn file_timestamp<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format("%Y%m%d_%H%M%S").to_string()
}

/// Name of the file holding one container's logs.
///
/// The container name is left out only for pods with a single container whose
/// name has no `-` and is not the mesh proxy. `container_count` is the number of
/// containers being collected for the pod, so with a container filter it is
/// always 1 and `-c app` on a pod running `[app, istio-proxy]` yields
/// `{pod}_{timestamp}.log`.
pub fn log_file_name<Tz: TimeZone>(
    pod: &str,
    container: &str,
    container_count: usize,
    collected_at: &DateTime<Tz>,
) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let timestamp = file_timestamp(collected_at);
    let short = container_count == 1
        && container.split('-').count() == 1
        && container != MESH_PROXY_CONTAINER;

    if short {
        format!("{}_{}.log", pod, timestamp)
    } else {
        format!("{}_{}_{}.log", pod, container, timestamp)
    }
}

/// First line of every log file, followed by a blank line.
pub fn log_header<Tz: TimeZone>(pod: &str, container: &str, collected_at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!(
        "=== Pod: {} | Container: {} | Collected: {} ===\n\n",
        pod,
        container,
        collected_at.format("%Y-%m-%d %H:%M:%S")
    )
}

/// Converts an absolute lower bound into a relative window, never negative.
pub fn since_seconds_until(since: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    now.signed_duration_since(since).num_seconds().max(0)
}
