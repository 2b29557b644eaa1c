use crate::UrlError;
use url::Url;

/// Normalizes a configured target root
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed
/// 2. Require an `http` or `https` scheme and a host
/// 3. Reject query strings and fragments (a root names a folder)
/// 4. Ensure the path ends with `/` so prefix checks stay on segment boundaries
///
/// # Examples
///
/// ```
/// use reel_harvest::url::normalize_root;
///
/// let url = normalize_root("https://Files.Example.com/Movies").unwrap();
/// assert_eq!(url.as_str(), "https://files.example.com/Movies/");
/// ```
pub fn normalize_root(url_str: &str) -> Result<Url, UrlError> {
    let mut url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingHost);
    }

    if url.query().is_some() || url.fragment().is_some() {
        return Err(UrlError::Malformed(format!(
            "root must not carry a query or fragment: {}",
            url
        )));
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    Ok(url)
}

/// Returns the identifier used to remember a folder across runs
///
/// The query and fragment are dropped and the whole URL is percent-decoded, so
/// `Alita%20(2019)/` and `Alita (2019)/` name the same folder.
///
/// ```
/// use reel_harvest::url::folder_key;
/// use url::Url;
///
/// let url = Url::parse("https://x/movies/Alita%20(2019)/?C=N;O=D").unwrap();
/// assert_eq!(folder_key(&url), "https://x/movies/Alita (2019)/");
/// ```
pub fn folder_key(url: &Url) -> String {
    let mut url = url.clone();
    url.set_query(None);
    url.set_fragment(None);
    decode_component(url.as_str())
}

/// Percent-decodes a string, replacing invalid UTF-8 sequences
pub fn decode_component(input: &str) -> String {
    match urlencoding::decode(input) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => String::from_utf8_lossy(&urlencoding::decode_binary(input.as_bytes())).into_owned(),
    }
}
