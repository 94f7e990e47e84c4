use std::time::Duration;

use bytes::Bytes;

use super::dataset::Dataset;
use crate::cache::{DemCache, RasterKey};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::geometry::BoundingBox;

/// Characters of an error page kept in the error message
const SNIPPET_CHARS: usize = 200;

/// A validated, ready-to-send raster request
#[derive(Debug, Clone, PartialEq)]
pub struct DemRequest {
    pub dataset: Dataset,
    /// Box as sent to the provider, widened and rounded to 5 decimals
    pub bbox: BoundingBox,
    pub url: String,
    params: Vec<(&'static str, String)>,
}

impl DemRequest {
    /// Checks the request against provider limits without touching the network
    pub fn new(base_url: &str, bbox: &BoundingBox, dataset: Dataset, api_key: &str) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(Error::MissingApiKey);
        }

        let bbox = bbox.for_raster();
        if bbox.crosses_antimeridian() {
            return Err(Error::CrossesAntimeridian {
                min_lon: bbox.min_lon,
                max_lon: bbox.max_lon,
            });
        }

        let area_km2 = bbox.area_km2();
        if area_km2 > dataset.max_area_km2() {
            return Err(Error::AreaTooLarge {
                dataset: dataset.code().to_string(),
                area_km2,
                limit_km2: dataset.max_area_km2(),
            });
        }

        let endpoint = dataset.endpoint();
        let url = format!("{}/{}", base_url.trim_end_matches('/'), endpoint.path());
        let params = vec![
            (endpoint.dataset_param(), dataset.code().to_string()),
            ("south", format!("{:.5}", bbox.min_lat)),
            ("north", format!("{:.5}", bbox.max_lat)),
            ("west", format!("{:.5}", bbox.min_lon)),
            ("east", format!("{:.5}", bbox.max_lon)),
            ("outputFormat", "GTiff".to_string()),
            ("API_Key", api_key.trim().to_string()),
        ];

        Ok(Self {
            dataset,
            bbox,
            url,
            params,
        })
    }

    pub fn query(&self) -> &[(&'static str, String)] {
        &self.params
    }

    pub fn cache_key(&self) -> RasterKey {
        RasterKey::new(&self.bbox, self.dataset)
    }
}

/// Raw raster bytes as delivered by the provider
#[derive(Debug, Clone)]
pub struct Raster {
    pub dataset: Dataset,
    pub bbox: BoundingBox,
    pub bytes: Bytes,
    pub from_cache: bool,
}

/// Maps a provider response to raster bytes or a descriptive error
///
/// A 200 answer is only trusted when it is not a text/HTML page; the
/// provider reports many failures as a 200 error page.
pub fn classify_response(
    dataset: Dataset,
    status: u16,
    reason: &str,
    content_type: Option<&str>,
    body: Bytes,
) -> Result<Bytes> {
    match status {
        200 => {
            let is_text = content_type
                .and_then(|ct| ct.trim().parse::<mime::Mime>().ok())
                .map(|m| m.type_() == mime::TEXT)
                .unwrap_or(false);
            if is_text || looks_like_html(&body) {
                return Err(Error::Provider(snippet(&body)));
            }
            if body.is_empty() {
                return Err(Error::Provider("empty response body".to_string()));
            }
            Ok(body)
        }
        204 | 404 => Err(Error::NoCoverage {
            dataset: dataset.code().to_string(),
        }),
        401 | 403 => Err(Error::Unauthorized(status)),
        400 => Err(Error::Rejected(snippet(&body))),
        _ => Err(Error::HttpStatus {
            status,
            reason: reason.to_string(),
        }),
    }
}

fn looks_like_html(body: &[u8]) -> bool {
    let head = String::from_utf8_lossy(&body[..body.len().min(64)]);
    let head = head.trim_start().to_ascii_lowercase();
    head.starts_with("<!doctype") || head.starts_with("<html")
}

fn snippet(body: &[u8]) -> String {
    String::from_utf8_lossy(body)
        .trim()
        .chars()
        .take(SNIPPET_CHARS)
        .collect()
}

/// OpenTopography raster client with an in-memory result cache
#[derive(Clone)]
pub struct DemClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    timeout_secs: u64,
    cache: DemCache,
}

impl DemClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.opentopography_url.clone(),
            api_key: config.opentopography_api_key.clone(),
            timeout_secs: config.request_timeout_secs,
            cache: DemCache::new(config.dem_cache_capacity),
        })
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Builds the request for `bbox` without sending it
    pub fn prepare(&self, bbox: &BoundingBox, dataset: Dataset) -> Result<DemRequest> {
        DemRequest::new(
            &self.base_url,
            bbox,
            dataset,
            self.api_key.as_deref().unwrap_or(""),
        )
    }

    /// Downloads the raster covering `bbox`, serving repeats from the cache
    pub async fn fetch(&self, bbox: &BoundingBox, dataset: Dataset) -> Result<Raster> {
        let request = self.prepare(bbox, dataset)?;
        let key = request.cache_key();

        if let Some(bytes) = self.cache.get(&key) {
            tracing::debug!(%dataset, bbox = %request.bbox, "raster served from cache");
            return Ok(Raster {
                dataset,
                bbox: request.bbox,
                bytes,
                from_cache: true,
            });
        }

        tracing::debug!(url = %request.url, %dataset, bbox = %request.bbox, "requesting raster");

        let response = self
            .client
            .get(&request.url)
            .query(request.query())
            .send()
            .await
            .map_err(|e| self.map_transport(e))?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await.map_err(|e| self.map_transport(e))?;

        let bytes = classify_response(
            dataset,
            status.as_u16(),
            status.canonical_reason().unwrap_or(""),
            content_type.as_deref(),
            body,
        )?;

        tracing::info!(%dataset, bytes = bytes.len(), bbox = %request.bbox, "raster downloaded");
        self.cache.put(key, bytes.clone());

        Ok(Raster {
            dataset,
            bbox: request.bbox,
            bytes,
            from_cache: false,
        })
    }

    /// Tries `datasets` in order, moving on only when a dataset itself is the problem
    ///
    /// Authorization, antimeridian and transport failures end the attempt
    /// immediately; the last dataset's error is returned when all fail.
    pub async fn fetch_with_fallback(&self, bbox: &BoundingBox, datasets: &[Dataset]) -> Result<Raster> {
        if datasets.is_empty() {
            return Err(Error::InvalidInput("no datasets to try".to_string()));
        }

        let mut last_err = None;
        for dataset in datasets {
            match self.fetch(bbox, *dataset).await {
                Ok(raster) => return Ok(raster),
                Err(e) if e.is_dataset_specific() => {
                    tracing::warn!(%dataset, error = %e, "dataset failed, trying next");
                    last_err = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_err.unwrap_or_else(|| Error::InvalidInput("no datasets to try".to_string())))
    }

    pub fn cache(&self) -> &DemCache {
        &self.cache
    }

    fn map_transport(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout(self.timeout_secs)
        } else {
            Error::Http(err)
        }
    }
}
