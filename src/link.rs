//! Share-link normalization for cloud-hosted images.
//!
//! Admins paste whatever link their storage provider hands them. Most of those
//! links point at a viewer page, not at image bytes, so an `<img src>` using
//! them renders nothing. This module rewrites the known share shapes into
//! direct-serving URLs.
//!
//! ## Recognized shapes
//!
//! | Input | Output |
//! |-------|--------|
//! | `drive.google.com/file/d/{id}/view` | `lh3.googleusercontent.com/d/{id}` |
//! | `drive.google.com/uc?id={id}` | `lh3.googleusercontent.com/d/{id}` |
//! | `drive.google.com/open?id={id}` | `lh3.googleusercontent.com/d/{id}` |
//! | `onedrive.live.com/...?resid=..&authkey=..` | `onedrive.live.com/download?resid=..&authkey=..` |
//! | `onedrive.live.com/...?cid=..&id=..` | `onedrive.live.com/download?cid=..&id=..` |
//! | `1drv.ms/...` | unchanged (needs a redirect to expand) |
//!
//! Nothing here fails. A link that cannot be converted comes back as it went
//! in, and the caller renders it as-is.

use regex::Regex;
use std::sync::LazyLock;
use url::Url;

/// Host that serves Google Drive files directly to `<img>` tags.
pub const GOOGLE_DIRECT_HOST: &str = "lh3.googleusercontent.com";

const GOOGLE_DRIVE_HOST: &str = "drive.google.com";
const ONEDRIVE_HOST: &str = "onedrive.live.com";
const ONEDRIVE_SHORT_HOST: &str = "1drv.ms";
const ONEDRIVE_DOWNLOAD: &str = "https://onedrive.live.com/download";

static DRIVE_FILE_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/file/d/([a-zA-Z0-9_-]+)").expect("valid regex"));

/// Resize and quality hints for the direct-serving host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptimizeOptions {
    pub width: u32,
    pub quality: u32,
}

impl Default for OptimizeOptions {
    fn default() -> Self {
        Self {
            width: 800,
            quality: 85,
        }
    }
}

/// What a link looks like, before any rewriting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    /// Already on [`GOOGLE_DIRECT_HOST`].
    GoogleDirect,
    /// A `drive.google.com` share link.
    GoogleShare,
    /// A OneDrive `/download?` endpoint.
    OneDriveDownload,
    /// A full `onedrive.live.com` share link.
    OneDriveShare,
    /// A `1drv.ms` short link.
    OneDriveShort,
    /// Any other host; assumed to serve the image directly.
    Other,
}

/// Classify a link by host and path.
pub fn classify(url: &str) -> LinkKind {
    let lower = url.to_ascii_lowercase();
    if url.contains(GOOGLE_DIRECT_HOST) {
        LinkKind::GoogleDirect
    } else if url.contains(GOOGLE_DRIVE_HOST) {
        LinkKind::GoogleShare
    } else if lower.contains(ONEDRIVE_SHORT_HOST) {
        LinkKind::OneDriveShort
    } else if lower.contains(ONEDRIVE_HOST) {
        if url.contains("/download?") {
            LinkKind::OneDriveDownload
        } else {
            LinkKind::OneDriveShare
        }
    } else {
        LinkKind::Other
    }
}

/// Rewrite a share link into a directly embeddable image URL.
///
/// Unrecognized or unconvertible input is returned unchanged.
pub fn normalize(url: &str) -> String {
    let url = url.trim();
    match classify(url) {
        LinkKind::GoogleShare => convert_google_drive(url).unwrap_or_else(|| url.to_string()),
        LinkKind::OneDriveShort => {
            tracing::warn!(url, "OneDrive short links cannot be expanded; use the full share URL");
            url.to_string()
        }
        LinkKind::OneDriveShare => convert_onedrive(url).unwrap_or_else(|| {
            tracing::warn!(url, "could not convert OneDrive link to a download URL");
            url.to_string()
        }),
        LinkKind::GoogleDirect | LinkKind::OneDriveDownload | LinkKind::Other => url.to_string(),
    }
}

/// Append width/quality hints to a direct-serving Google URL.
///
/// Other URLs pass through. Parameters are appended, never merged: calling
/// this twice leaves two `w=`/`q=` pairs in the query.
pub fn optimize(url: &str, options: OptimizeOptions) -> String {
    if !url.contains(GOOGLE_DIRECT_HOST) {
        return url.to_string();
    }
    let sep = if url.contains('?') { '&' } else { '?' };
    format!("{url}{sep}w={}&q={}", options.width, options.quality)
}

/// Normalize, then optimize. This is what the renderer puts in `src`.
pub fn display_url(url: &str, options: OptimizeOptions) -> String {
    optimize(&normalize(url), options)
}

fn google_direct(file_id: &str) -> String {
    format!("https://{GOOGLE_DIRECT_HOST}/d/{file_id}")
}

fn convert_google_drive(url: &str) -> Option<String> {
    if url.contains("drive.google.com/file/d/")
        && let Some(caps) = DRIVE_FILE_ID.captures(url)
    {
        return Some(google_direct(&caps[1]));
    }
    if url.contains("drive.google.com/uc?") || url.contains("drive.google.com/open?") {
        let parsed = Url::parse(url).ok()?;
        let id = query_param(&parsed, "id")?;
        return Some(google_direct(&id));
    }
    None
}

fn convert_onedrive(url: &str) -> Option<String> {
    let parsed = match Url::parse(url) {
        Ok(parsed) => parsed,
        Err(err) => {
            tracing::warn!(url, error = %err, "unparseable OneDrive link");
            return None;
        }
    };
    let resid = query_param(&parsed, "resid");
    let authkey = query_param(&parsed, "authkey");
    let cid = query_param(&parsed, "cid");
    let id = query_param(&parsed, "id");

    let mut download = Url::parse(ONEDRIVE_DOWNLOAD).ok()?;
    if let Some(resid) = resid {
        let mut pairs = download.query_pairs_mut();
        pairs.append_pair("resid", &resid);
        if let Some(authkey) = authkey {
            pairs.append_pair("authkey", &authkey);
        }
    } else if let (Some(cid), Some(id)) = (cid, id) {
        download
            .query_pairs_mut()
            .append_pair("cid", &cid)
            .append_pair("id", &id);
    } else {
        return None;
    }
    Some(download.to_string())
}

/// First value of `name`. An empty value counts as absent.
fn query_param(url: &Url, name: &str) -> Option<String> {
    url.query_pairs()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIRECT: &str = "https://lh3.googleusercontent.com/d/ABC123";

    // =========================================================================
    // Google Drive
    // =========================================================================

    #[test]
    fn drive_share_forms_agree() {
        let forms = [
            "https://drive.google.com/file/d/ABC123/view",
            "https://drive.google.com/file/d/ABC123/view?usp=sharing",
            "https://drive.google.com/uc?id=ABC123",
            "https://drive.google.com/uc?export=download&id=ABC123",
            "https://drive.google.com/open?id=ABC123",
            DIRECT,
        ];
        for form in forms {
            assert_eq!(normalize(form), DIRECT, "form: {form}");
        }
    }

    #[test]
    fn drive_id_keeps_dashes_and_underscores() {
        assert_eq!(
            normalize("https://drive.google.com/file/d/1SQA3jci-gQ5b_nh/view"),
            "https://lh3.googleusercontent.com/d/1SQA3jci-gQ5b_nh"
        );
    }

    #[test]
    fn drive_without_id_passes_through() {
        let url = "https://drive.google.com/drive/folders/XYZ";
        assert_eq!(normalize(url), url);
        let url = "https://drive.google.com/uc?export=download";
        assert_eq!(normalize(url), url);
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        assert_eq!(
            normalize("  https://drive.google.com/open?id=ABC123\n"),
            DIRECT
        );
    }

    // =========================================================================
    // OneDrive
    // =========================================================================

    #[test]
    fn onedrive_resid_with_authkey() {
        let out = normalize("https://onedrive.live.com/redir?resid=ABC123&authkey=KEY9");
        assert_eq!(
            out,
            "https://onedrive.live.com/download?resid=ABC123&authkey=KEY9"
        );
    }

    #[test]
    fn onedrive_resid_is_query_encoded() {
        let out = normalize("https://onedrive.live.com/?resid=ABC%21123");
        assert_eq!(out, "https://onedrive.live.com/download?resid=ABC%21123");
    }

    #[test]
    fn onedrive_cid_and_id() {
        let out = normalize("https://onedrive.live.com/?cid=C1&id=I2");
        assert_eq!(out, "https://onedrive.live.com/download?cid=C1&id=I2");
    }

    #[test]
    fn onedrive_empty_resid_falls_back_to_cid_and_id() {
        let out = normalize("https://onedrive.live.com/?resid=&cid=C1&id=I2");
        assert_eq!(out, "https://onedrive.live.com/download?cid=C1&id=I2");
    }

    #[test]
    fn onedrive_empty_authkey_is_dropped() {
        let out = normalize("https://onedrive.live.com/redir?resid=R&authkey=");
        assert_eq!(out, "https://onedrive.live.com/download?resid=R");
    }

    #[test]
    fn onedrive_empty_cid_or_id_passes_through() {
        for url in [
            "https://onedrive.live.com/?cid=&id=I2",
            "https://onedrive.live.com/?cid=C1&id=",
        ] {
            assert_eq!(normalize(url), url);
        }
    }

    #[test]
    fn onedrive_without_params_passes_through() {
        let url = "https://onedrive.live.com/?cid=C1";
        assert_eq!(normalize(url), url);
    }

    #[test]
    fn onedrive_download_passes_through() {
        let url = "https://onedrive.live.com/download?resid=R&authkey=K";
        assert_eq!(normalize(url), url);
    }

    #[test]
    fn onedrive_host_match_ignores_case() {
        assert_eq!(classify("https://OneDrive.Live.com/?resid=R"), LinkKind::OneDriveShare);
    }

    #[test]
    fn short_links_pass_through() {
        let url = "https://1drv.ms/i/s!AbCdEf";
        assert_eq!(normalize(url), url);
        assert_eq!(classify(url), LinkKind::OneDriveShort);
    }

    #[test]
    fn unknown_hosts_pass_through() {
        for url in ["https://example.com/a.jpg", "not a url", ""] {
            assert_eq!(normalize(url), url);
        }
    }

    // =========================================================================
    // optimize
    // =========================================================================

    #[test]
    fn optimize_uses_question_mark_without_query() {
        let out = optimize(DIRECT, OptimizeOptions::default());
        assert_eq!(out, format!("{DIRECT}?w=800&q=85"));
    }

    #[test]
    fn optimize_uses_ampersand_with_query() {
        let url = format!("{DIRECT}?authuser=0");
        let out = optimize(
            &url,
            OptimizeOptions {
                width: 400,
                quality: 80,
            },
        );
        assert_eq!(out, format!("{DIRECT}?authuser=0&w=400&q=80"));
    }

    #[test]
    fn optimize_after_normalize_contains_hints() {
        let out = optimize(
            &normalize("https://drive.google.com/file/d/ABC123/view"),
            OptimizeOptions {
                width: 640,
                quality: 70,
            },
        );
        assert!(out.contains("w=640"));
        assert!(out.contains("q=70"));
        assert!(out.contains("?w="));
    }

    #[test]
    fn optimize_ignores_other_hosts() {
        let url = "https://onedrive.live.com/download?resid=R";
        assert_eq!(optimize(url, OptimizeOptions::default()), url);
    }

    #[test]
    fn optimize_twice_accumulates_parameters() {
        let once = optimize(DIRECT, OptimizeOptions::default());
        let twice = optimize(&once, OptimizeOptions::default());
        assert_eq!(twice, format!("{DIRECT}?w=800&q=85&w=800&q=85"));
        assert_eq!(twice.matches("w=800").count(), 2);
    }

    #[test]
    fn display_url_normalizes_then_optimizes() {
        let out = display_url(
            "https://drive.google.com/uc?export=download&id=ABC123",
            OptimizeOptions::default(),
        );
        assert_eq!(out, format!("{DIRECT}?w=800&q=85"));
    }

    #[test]
    fn classify_shapes() {
        assert_eq!(classify(DIRECT), LinkKind::GoogleDirect);
        assert_eq!(
            classify("https://drive.google.com/file/d/X/view"),
            LinkKind::GoogleShare
        );
        assert_eq!(
            classify("https://onedrive.live.com/download?cid=1&id=2"),
            LinkKind::OneDriveDownload
        );
        assert_eq!(classify("https://example.com/x.png"), LinkKind::Other);
    }
}
