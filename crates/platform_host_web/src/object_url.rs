//! `URL.createObjectURL`-backed locator service.

use platform_host::{BlobSource, ObjectUrlFuture, ObjectUrlService};

#[cfg(not(target_arch = "wasm32"))]
fn unsupported(operation: &str) -> String {
    format!("object urls are only available when compiled for wasm32: {operation}")
}

#[cfg(target_arch = "wasm32")]
async fn fetch_ok(url: &str) -> Result<web_sys::Response, String> {
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::JsFuture;

    let window = web_sys::window().ok_or_else(|| "window unavailable".to_string())?;
    let response: web_sys::Response = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(|e| format!("fetch failed: {e:?}"))?
        .dyn_into()
        .map_err(|_| "fetch did not return a Response".to_string())?;
    if !response.ok() {
        return Err(format!("fetch failed with status {}", response.status()));
    }
    Ok(response)
}

#[cfg(target_arch = "wasm32")]
async fn buffer_bytes(buffer: js_sys::Promise) -> Result<Vec<u8>, String> {
    let buffer = wasm_bindgen_futures::JsFuture::from(buffer)
        .await
        .map_err(|e| format!("arrayBuffer failed: {e:?}"))?;
    Ok(js_sys::Uint8Array::new(&buffer).to_vec())
}

#[derive(Debug, Clone, Copy, Default)]
/// Browser locator service: object URLs for bytes, `fetch` for reads, anchors for downloads.
pub struct WebObjectUrlService;

impl ObjectUrlService for WebObjectUrlService {
    fn register(&self, source: BlobSource) -> Result<String, String> {
        #[cfg(target_arch = "wasm32")]
        {
            match source {
                BlobSource::HostUrl(url) => Ok(url),
                BlobSource::Bytes(bytes) => {
                    let array = js_sys::Uint8Array::from(bytes.as_ref());
                    let parts = js_sys::Array::of1(&array);
                    let blob = web_sys::Blob::new_with_u8_array_sequence(&parts)
                        .map_err(|e| format!("blob creation failed: {e:?}"))?;
                    web_sys::Url::create_object_url_with_blob(&blob)
                        .map_err(|e| format!("createObjectURL failed: {e:?}"))
                }
            }
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = source;
            Err(unsupported("register"))
        }
    }

    fn revoke(&self, url: &str) {
        #[cfg(target_arch = "wasm32")]
        if let Err(err) = web_sys::Url::revoke_object_url(url) {
            web_sys::console::warn_1(&format!("revokeObjectURL failed for {url}: {err:?}").into());
        }

        #[cfg(not(target_arch = "wasm32"))]
        let _ = url;
    }

    fn read_bytes<'a>(&'a self, url: &'a str) -> ObjectUrlFuture<'a, Result<Vec<u8>, String>> {
        Box::pin(async move {
            #[cfg(target_arch = "wasm32")]
            {
                let response = fetch_ok(url).await?;
                let buffer = response
                    .array_buffer()
                    .map_err(|e| format!("arrayBuffer failed: {e:?}"))?;
                buffer_bytes(buffer).await
            }

            #[cfg(not(target_arch = "wasm32"))]
            {
                let _ = url;
                Err(unsupported("read_bytes"))
            }
        })
    }

    fn read_prefix<'a>(
        &'a self,
        url: &'a str,
        max_bytes: usize,
    ) -> ObjectUrlFuture<'a, Result<Vec<u8>, String>> {
        Box::pin(async move {
            #[cfg(target_arch = "wasm32")]
            {
                use wasm_bindgen::JsCast;
                use wasm_bindgen_futures::JsFuture;

                // Blob bodies are lazy; only the sliced range is copied into wasm memory.
                let response = fetch_ok(url).await?;
                let blob = response.blob().map_err(|e| format!("blob failed: {e:?}"))?;
                let blob: web_sys::Blob = JsFuture::from(blob)
                    .await
                    .map_err(|e| format!("blob failed: {e:?}"))?
                    .dyn_into()
                    .map_err(|_| "response body is not a Blob".to_string())?;
                let prefix = blob
                    .slice_with_f64_and_f64(0.0, max_bytes as f64)
                    .map_err(|e| format!("blob slice failed: {e:?}"))?;
                buffer_bytes(prefix.array_buffer()).await
            }

            #[cfg(not(target_arch = "wasm32"))]
            {
                let _ = (url, max_bytes);
                Err(unsupported("read_prefix"))
            }
        })
    }

    fn download(&self, url: &str, file_name: &str) -> Result<(), String> {
        #[cfg(target_arch = "wasm32")]
        {
            use wasm_bindgen::JsCast;

            let document = web_sys::window()
                .and_then(|w| w.document())
                .ok_or_else(|| "document unavailable".to_string())?;
            let body = document
                .body()
                .ok_or_else(|| "document body unavailable".to_string())?;
            let anchor: web_sys::HtmlAnchorElement = document
                .create_element("a")
                .map_err(|e| format!("create anchor failed: {e:?}"))?
                .dyn_into()
                .map_err(|_| "created element is not an anchor".to_string())?;
            anchor.set_href(url);
            anchor.set_download(file_name);
            body.append_child(&anchor)
                .map_err(|e| format!("attach anchor failed: {e:?}"))?;
            anchor.click();
            let _ = body.remove_child(&anchor);
            Ok(())
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = (url, file_name);
            Err(unsupported("download"))
        }
    }
}
