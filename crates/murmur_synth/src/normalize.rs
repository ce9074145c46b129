//! Request normalization.

use murmur_common::{CanonicalOptions, RequestOptions};

/// Parameter name the text to synthesize is sent under.
pub const TEXT_KEY: &str = "Text";

/// Merges per-call options over the service defaults and injects the text.
///
/// On a key collision the per-call value wins. The text is always sent under
/// [`TEXT_KEY`], replacing any option of that name. Every value is
/// stringified because backends take string-typed parameters.
pub fn normalize(
    text: &str,
    request_options: &RequestOptions,
    service_defaults: &RequestOptions,
) -> CanonicalOptions {
    let mut canonical = CanonicalOptions::new();
    for (key, value) in service_defaults.iter().chain(request_options) {
        canonical.insert(key.clone(), value.to_param());
    }
    canonical.insert(TEXT_KEY, text);
    canonical
}
