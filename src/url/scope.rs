use crate::url::normalize::decode_component;
use url::Url;

/// Checks whether a URL lies inside the subtree rooted at `root`
///
/// The candidate must share the root's scheme, host and port. Its path is
/// compared segment by segment: each of the root's segments must match the
/// candidate's segment at the same position once both are percent-decoded.
/// Segments below the root must not decode to `.` or `..`, or contain a `/`,
/// so `/movies%2F..%2Fsecret/` never passes for a child of `/movies/`. The
/// root itself is in scope.
///
/// # Examples
///
/// ```
/// use reel_harvest::url::is_within_root;
/// use url::Url;
///
/// let root = Url::parse("https://x/movies/").unwrap();
///
/// assert!(is_within_root(&root, &Url::parse("https://x/movies/Alita%20(2019)/").unwrap()));
/// assert!(!is_within_root(&root, &Url::parse("https://x/").unwrap()));
/// assert!(!is_within_root(&root, &Url::parse("https://x/movies-old/").unwrap()));
/// assert!(!is_within_root(&root, &Url::parse("https://x/movies%2Fevil/").unwrap()));
/// assert!(!is_within_root(&root, &Url::parse("https://y/movies/").unwrap()));
/// ```
pub fn is_within_root(root: &Url, candidate: &Url) -> bool {
    relative_segments(root, candidate).is_some()
}

/// Number of path segments between `root` and `url`
///
/// Returns 0 for the root itself and for URLs outside the root.
pub fn depth_below(root: &Url, url: &Url) -> u32 {
    relative_segments(root, url).map_or(0, |segments| segments.len() as u32)
}

/// Lists the folders strictly between `root` and `folder`, outermost first
///
/// For root `/m/` and folder `/m/a/b/c/` this yields `/m/a/` and `/m/a/b/`.
pub fn ancestors_within(root: &Url, folder: &Url) -> Vec<Url> {
    let segments = match relative_segments(root, folder) {
        Some(segments) if segments.len() >= 2 => segments,
        _ => return Vec::new(),
    };

    let base = root.path().trim_end_matches('/');
    let mut ancestors = Vec::with_capacity(segments.len() - 1);
    for end in 1..segments.len() {
        let mut url = root.clone();
        url.set_query(None);
        url.set_fragment(None);
        url.set_path(&format!("{}/{}/", base, segments[..end].join("/")));
        ancestors.push(url);
    }
    ancestors
}

/// Raw (still encoded) path segments of `url` below `root`, `None` when out of scope
fn relative_segments<'a>(root: &Url, url: &'a Url) -> Option<Vec<&'a str>> {
    if url.scheme() != root.scheme()
        || url.host_str() != root.host_str()
        || url.port_or_known_default() != root.port_or_known_default()
    {
        return None;
    }

    let root_segments = path_segments(root);
    let segments = path_segments(url);
    if segments.len() < root_segments.len() {
        return None;
    }

    let same_prefix = root_segments
        .iter()
        .zip(&segments)
        .all(|(expected, actual)| decode_component(expected) == decode_component(actual));
    if !same_prefix {
        return None;
    }

    let below = segments[root_segments.len()..].to_vec();
    below.iter().all(|s| is_plain_segment(s)).then_some(below)
}

fn path_segments(url: &Url) -> Vec<&str> {
    url.path().split('/').filter(|s| !s.is_empty()).collect()
}

/// A segment that names exactly one child folder or file
fn is_plain_segment(raw: &str) -> bool {
    let decoded = decode_component(raw);
    !decoded.contains('/') && !decoded.contains('\\') && decoded != "." && decoded != ".."
}
