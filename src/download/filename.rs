//! Output filename derivation from a URL's final path segment.

use std::borrow::Cow;

use tracing::debug;
use url::Url;

use super::DownloadError;

/// Derives the output filename from the final path segment of `url`.
///
/// The segment is percent-decoded. Query strings and fragments are not part
/// of the path and never leak into the name.
///
/// # Errors
///
/// Returns [`DownloadError::InvalidUrl`] if `url` does not parse, and
/// [`DownloadError::MissingFilename`] if the final segment is empty (trailing
/// slash, bare host), a dot segment, or decodes to something containing a
/// path separator.
pub fn filename_from_url(url: &str) -> Result<String, DownloadError> {
    let parsed = Url::parse(url).map_err(|_| DownloadError::invalid_url(url))?;
    let last = parsed
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .unwrap_or("");

    let decoded = urlencoding::decode(last).unwrap_or_else(|e| {
        debug!(segment = %last, error = %e, "URL decoding failed, using raw segment");
        Cow::Borrowed(last)
    });

    if decoded.is_empty()
        || decoded == "."
        || decoded == ".."
        || decoded.contains(['/', '\\', '\0'])
    {
        return Err(DownloadError::missing_filename(url));
    }

    Ok(decoded.into_owned())
}
