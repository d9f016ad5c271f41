//! API endpoint modules.

mod account;
mod exploit;
mod scan;
mod search;
mod stream;
mod tools;

pub use account::AccountApi;
pub use exploit::{ExploitApi, ExploitRequestBuilder};
pub use scan::ScanApi;
pub use search::{CountRequestBuilder, HostRequestBuilder, SearchApi, SearchRequestBuilder};
pub use stream::StreamApi;
pub use tools::ToolsApi;

use shodan_core::{Result, ShodanError};

/// Serde predicate: omit boolean flags that are off
#[allow(clippy::trivially_copy_pass_by_ref)]
const fn is_false(flag: &bool) -> bool {
    !*flag
}

/// Serde predicate: omit the page number for the first page
#[allow(clippy::trivially_copy_pass_by_ref)]
const fn is_first_page(page: &u32) -> bool {
    *page <= 1
}

/// Facets travel as one comma-separated parameter
fn join_facets(facets: &[String]) -> Option<String> {
    (!facets.is_empty()).then(|| facets.join(","))
}

/// Check a caller-supplied value that is placed into the URL path as one
/// segment. Separators would silently change the request target.
fn path_segment<'s>(what: &str, value: &'s str) -> Result<&'s str> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ShodanError::InvalidQuery(format!("{what} must not be empty")));
    }
    if value.contains(['/', '?', '#']) {
        return Err(ShodanError::InvalidQuery(format!(
            "{what} must not contain '/', '?' or '#': {value}"
        )));
    }
    Ok(value)
}
