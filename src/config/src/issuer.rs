//! Space separated allow-lists with local-unit scheme virtualization
//!
//! Configuration may refer to the running unit as `cellguard-localunit:/path`
//! so the same file works on every deployment. Before comparison such entries
//! are rewritten against the concrete unit base URL.

/// Scheme marking a URL relative to the local unit
pub const LOCAL_UNIT_SCHEME: &str = "cellguard-localunit";

/// Rewrite a local-unit URL to an absolute URL under `unit_base_url`
///
/// Values using any other scheme are returned unchanged.
pub fn resolve_local_unit(unit_base_url: &str, value: &str) -> String {
    let Some(rest) = value
        .strip_prefix(LOCAL_UNIT_SCHEME)
        .and_then(|rest| rest.strip_prefix(':'))
    else {
        return value.to_string();
    };

    let base = unit_base_url.trim_end_matches('/');
    let path = rest.trim_start_matches('/');
    format!("{}/{}", base, path)
}

/// Whether `candidate` appears in the space separated `list`
pub fn is_listed(list: Option<&str>, candidate: Option<&str>, unit_base_url: &str) -> bool {
    let (Some(list), Some(candidate)) = (list, candidate) else {
        return false;
    };

    list.split(' ')
        .any(|entry| resolve_local_unit(unit_base_url, entry) == candidate)
}
