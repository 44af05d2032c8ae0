//! Blocking Kaggle REST client on libcurl.
//!
//! Authenticates with HTTP Basic (username + API key), follows redirects to
//! the storage backend, and streams response bodies straight to disk.

use anyhow::{anyhow, Context, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::{Credentials, KaggleApi};
use crate::archive;
use crate::config::KfetchConfig;
use crate::error::FetchError;

const USER_AGENT: &str = concat!("kfetch/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Deserialize)]
struct KernelPullResponse {
    blob: KernelBlob,
}

#[derive(Debug, Deserialize)]
struct KernelBlob {
    source: String,
    #[serde(default)]
    language: Option<String>,
    #[serde(default, rename = "kernelType")]
    kernel_type: Option<String>,
}

/// File extension Kaggle uses for a kernel of `kernel_type` written in `language`.
pub fn kernel_extension(kernel_type: Option<&str>, language: Option<&str>) -> &'static str {
    let language = language.unwrap_or("python").to_ascii_lowercase();
    if kernel_type.map_or(true, |t| t.eq_ignore_ascii_case("notebook")) {
        return if language == "rmarkdown" { ".Rmd" } else { ".ipynb" };
    }
    match language.as_str() {
        "r" => ".R",
        "rmarkdown" => ".Rmd",
        "sqlite" => ".sql",
        "julia" => ".jl",
        _ => ".py",
    }
}

#[derive(Debug, Clone)]
pub struct KaggleClient {
    base_url: String,
    credentials: Credentials,
    connect_timeout: Duration,
    timeout: Option<Duration>,
}

impl KaggleClient {
    pub fn new(base_url: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            base_url: base_url.into(),
            credentials,
            connect_timeout: Duration::from_secs(30),
            timeout: None,
        }
    }

    /// Client configured from `cfg`, with credentials from the usual Kaggle locations.
    pub fn from_config(cfg: &KfetchConfig) -> Result<Self> {
        let credentials = Credentials::load()?;
        let mut client = Self::new(cfg.api_base_url.clone(), credentials);
        client.connect_timeout = Duration::from_secs(cfg.connect_timeout_secs);
        client.timeout = cfg.transfer_timeout_secs.map(Duration::from_secs);
        Ok(client)
    }

    /// `{base}/seg/seg/...`, each segment percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Result<url::Url> {
        let mut url = url::Url::parse(&self.base_url)
            .with_context(|| format!("invalid API base URL {}", self.base_url))?;
        url.path_segments_mut()
            .map_err(|_| anyhow!("API base URL cannot take a path: {}", self.base_url))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn easy(&self, url: &url::Url) -> Result<curl::easy::Easy> {
        let mut easy = curl::easy::Easy::new();
        easy.url(url.as_str()).context("invalid URL")?;
        easy.follow_location(true)?;
        easy.max_redirections(10)?;
        easy.useragent(USER_AGENT)?;
        easy.username(&self.credentials.username)?;
        easy.password(&self.credentials.key)?;
        easy.connect_timeout(self.connect_timeout)?;
        if let Some(t) = self.timeout {
            easy.timeout(t)?;
        }
        Ok(easy)
    }

    fn get_json<T: DeserializeOwned>(&self, url: &url::Url) -> Result<T> {
        tracing::debug!("GET {}", url);
        let mut body = Vec::new();
        let mut easy = self.easy(url)?;
        {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform().context("GET request failed")?;
        }
        check_status(&mut easy, url)?;
        serde_json::from_slice(&body).with_context(|| format!("decode response from {}", url))
    }

    /// Streams the body of `url` into `dest`. Returns the number of bytes written.
    /// On a non-2xx status `dest` is removed again.
    fn download_to(&self, url: &url::Url, dest: &Path) -> Result<u64> {
        tracing::debug!("GET {} -> {}", url, dest.display());
        let mut file = File::create(dest).with_context(|| format!("create {}", dest.display()))?;
        let mut written: u64 = 0;
        let mut write_err: Option<io::Error> = None;
        let mut easy = self.easy(url)?;
        let performed = {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| match file.write_all(data) {
                Ok(()) => {
                    written += data.len() as u64;
                    Ok(data.len())
                }
                Err(e) => {
                    tracing::warn!("write to {} failed: {}", dest.display(), e);
                    write_err = Some(e);
                    Ok(0) // abort transfer
                }
            })?;
            transfer.perform()
        };
        if let Some(e) = write_err {
            return Err(e).with_context(|| format!("write {}", dest.display()));
        }
        performed.context("GET request failed")?;
        file.flush()?;
        drop(file);

        if let Err(e) = check_status(&mut easy, url) {
            let _ = fs::remove_file(dest);
            return Err(e);
        }
        tracing::info!("downloaded {} bytes to {}", written, dest.display());
        Ok(written)
    }
}

fn check_status(easy: &mut curl::easy::Easy, url: &url::Url) -> Result<()> {
    let code = easy.response_code().context("no response code")?;
    if !(200..300).contains(&code) {
        return Err(FetchError::Http {
            status: code,
            url: url.to_string(),
        }
        .into());
    }
    Ok(())
}

fn split_ref<'a>(reference: &'a str, err: impl Fn() -> FetchError) -> Result<(&'a str, &'a str)> {
    match reference.trim_matches('/').split_once('/') {
        Some((owner, slug)) if !owner.is_empty() && !slug.is_empty() && !slug.contains('/') => {
            Ok((owner, slug))
        }
        _ => Err(err().into()),
    }
}

impl KaggleApi for KaggleClient {
    fn kernel_pull(&self, kernel: &str, path: &Path) -> Result<PathBuf> {
        let (owner, slug) = split_ref(kernel, || FetchError::InvalidKernelRef(kernel.to_string()))?;
        let mut url = self.endpoint(&["kernels", "pull"])?;
        url.query_pairs_mut()
            .append_pair("userName", owner)
            .append_pair("kernelSlug", slug);

        let response: KernelPullResponse = self.get_json(&url)?;
        let blob = response.blob;
        let ext = kernel_extension(blob.kernel_type.as_deref(), blob.language.as_deref());

        fs::create_dir_all(path).with_context(|| format!("create {}", path.display()))?;
        let dest = path.join(format!("{slug}{ext}"));
        fs::write(&dest, blob.source).with_context(|| format!("write {}", dest.display()))?;
        tracing::info!("pulled kernel {} to {}", kernel, dest.display());
        Ok(dest)
    }

    fn competition_download(
        &self,
        competition: &str,
        file_name: Option<&str>,
        path: &Path,
    ) -> Result<PathBuf> {
        let (url, dest) = match file_name {
            Some(f) => (
                self.endpoint(&["competitions", "data", "download", competition, f])?,
                path.join(f),
            ),
            None => (
                self.endpoint(&["competitions", "data", "download-all", competition])?,
                path.join(format!("{competition}.zip")),
            ),
        };
        self.download_to(&url, &dest)?;
        Ok(dest)
    }

    fn dataset_download(&self, dataset: &str, path: &Path, unzip: bool) -> Result<()> {
        let (owner, slug) = split_ref(dataset, || {
            FetchError::InvalidIdentifier(dataset.to_string(), "expected owner/dataset")
        })?;
        let url = self.endpoint(&["datasets", "download", owner, slug])?;

        fs::create_dir_all(path).with_context(|| format!("create {}", path.display()))?;
        let archive_path = path.join(format!("{slug}.zip"));
        self.download_to(&url, &archive_path)?;

        if unzip {
            archive::extract_zip(&archive_path, path)?;
            fs::remove_file(&archive_path)
                .with_context(|| format!("remove {}", archive_path.display()))?;
        }
        Ok(())
    }
}
