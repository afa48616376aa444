//! Converts browser `File` objects from the picker or a drop into session ingestion input.

use file_session::RawFile;
use platform_host::BlobSource;

/// Builds a [`RawFile`] for a browser file whose object URL the host already minted.
///
/// `size` comes from `File.size` (a JS number); the cast saturates and maps NaN to zero.
pub fn picked_file(name: String, size: f64, mime_type: String, object_url: String) -> RawFile {
    RawFile {
        name,
        size: size as u64,
        mime_type,
        source: BlobSource::HostUrl(object_url),
    }
}

/// Mints an object URL for every file in `files`. Files the browser refuses are skipped.
pub fn raw_files_from_list(files: &web_sys::FileList) -> Vec<RawFile> {
    #[cfg(target_arch = "wasm32")]
    {
        (0..files.length())
            .filter_map(|index| files.get(index))
            .filter_map(|file| match web_sys::Url::create_object_url_with_blob(&file) {
                Ok(url) => Some(picked_file(file.name(), file.size(), file.type_(), url)),
                Err(err) => {
                    leptos::logging::warn!("skipping {}: {err:?}", file.name());
                    None
                }
            })
            .collect()
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = files;
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn picked_files_adopt_the_host_url() {
        let raw = picked_file(
            "photo.jpg".to_string(),
            2048.0,
            "image/jpeg".to_string(),
            "blob:https://dropvault.test/1".to_string(),
        );
        assert_eq!(raw.size, 2048);
        assert_eq!(
            raw.source,
            BlobSource::HostUrl("blob:https://dropvault.test/1".to_string())
        );
    }

    #[test]
    fn odd_sizes_saturate() {
        let name = || "x".to_string();
        assert_eq!(picked_file(name(), f64::NAN, String::new(), name()).size, 0);
        assert_eq!(picked_file(name(), -5.0, String::new(), name()).size, 0);
    }
}
