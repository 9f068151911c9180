//! Channel list from the Channels DVR API.
//!
//! `GET /api/v1/channels` returns every channel the DVR knows about. Only
//! visible channels from TV-Everywhere sources are health-checked.

use async_trait::async_trait;
use serde::{Deserialize, Deserializer};
use tracing::{debug, info, instrument, warn};
use tvecheck_core::{Channel, ChannelNumber};
use url::Url;

use crate::client::HttpClient;
use crate::error::FetchError;

/// Default DVR address.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default DVR port.
pub const DEFAULT_PORT: u16 = 8089;

/// Path of the channel listing endpoint.
const CHANNELS_PATH: &str = "api/v1/channels";

/// `source_id` prefix of TV-Everywhere sources.
pub const TVE_SOURCE_PREFIX: &str = "TVE";

// ============================================================================
// DVR Server
// ============================================================================

/// Address of a Channels DVR server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DvrServer {
    base: Url,
}

impl DvrServer {
    /// Creates a server address from host and port.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::InvalidUrl`] if the pair does not form a URL.
    pub fn new(host: &str, port: u16) -> Result<Self, FetchError> {
        let raw = format!("http://{host}:{port}/");
        let base = Url::parse(&raw).map_err(|e| FetchError::InvalidUrl(format!("{raw}: {e}")))?;
        if base.host_str().is_none_or(str::is_empty) || base.path() != "/" {
            return Err(FetchError::InvalidUrl(raw));
        }
        Ok(Self { base })
    }

    /// Returns `host:port` for display.
    pub fn authority(&self) -> String {
        match (self.base.host_str(), self.base.port_or_known_default()) {
            (Some(host), Some(port)) => format!("{host}:{port}"),
            _ => self.base.to_string(),
        }
    }

    /// URL of the channel listing.
    pub fn channels_url(&self) -> String {
        format!("{}{CHANNELS_PATH}", self.base)
    }

    /// Playback URL of a channel's MPEG-TS stream.
    pub fn stream_url(&self, number: &ChannelNumber) -> String {
        format!("{}devices/ANY/channels/{number}/stream.mpg", self.base)
    }
}

impl Default for DvrServer {
    fn default() -> Self {
        Self {
            base: Url::parse(&format!("http://{DEFAULT_HOST}:{DEFAULT_PORT}/"))
                .unwrap_or_else(|e| panic!("default DVR address must parse: {e}")),
        }
    }
}

// ============================================================================
// API Types
// ============================================================================

/// One entry of the DVR channel listing.
///
/// Only the fields tvecheck needs; everything else is ignored. Missing or
/// `null` optional fields take their default.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiChannel {
    /// Channel number.
    pub number: ChannelNumber,
    /// Channel name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Hidden channels are skipped.
    #[serde(default, deserialize_with = "null_as_default")]
    pub hidden: bool,
    /// Source identifier, e.g. `TVE-Spectrum`.
    #[serde(default, deserialize_with = "null_as_default")]
    pub source_id: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Parses a channel listing entry by entry.
///
/// The body must be a JSON array; entries that do not parse are skipped
/// with a warning.
///
/// # Errors
///
/// [`FetchError::InvalidResponse`] if the body is not a JSON array.
pub fn parse_listing(body: &str) -> Result<Vec<ApiChannel>, FetchError> {
    let entries: Vec<serde_json::Value> = serde_json::from_str(body)
        .map_err(|e| FetchError::InvalidResponse(format!("channel listing: {e}")))?;

    let listing = entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| match serde_json::from_value(entry) {
            Ok(channel) => Some(channel),
            Err(e) => {
                warn!(index, error = %e, "Skipping malformed channel entry");
                None
            }
        })
        .collect();
    Ok(listing)
}

impl ApiChannel {
    /// Returns true for visible TV-Everywhere channels.
    pub fn is_visible_tve(&self) -> bool {
        !self.hidden && self.source_id.starts_with(TVE_SOURCE_PREFIX)
    }
}

/// Keeps visible TVE channels, sorted by number.
///
/// When the listing repeats a number, the last entry wins.
pub fn filter_tve_channels(listing: Vec<ApiChannel>) -> Vec<Channel> {
    let mut channels: std::collections::BTreeMap<ChannelNumber, String> =
        std::collections::BTreeMap::new();

    for entry in listing.into_iter().filter(ApiChannel::is_visible_tve) {
        channels.insert(entry.number, entry.name);
    }

    channels
        .into_iter()
        .map(|(number, name)| Channel { number, name })
        .collect()
}

// ============================================================================
// Channel Source
// ============================================================================

/// Where the list of channels to probe comes from.
#[async_trait]
pub trait ChannelSource: Send + Sync {
    /// Returns the channels to probe this pass.
    async fn channels(&self) -> Result<Vec<Channel>, FetchError>;
}

/// Channel source backed by the DVR HTTP API.
#[derive(Debug, Clone)]
pub struct DvrChannelSource {
    server: DvrServer,
    client: HttpClient,
}

impl DvrChannelSource {
    /// Creates a source for the given server.
    pub fn new(server: DvrServer, client: HttpClient) -> Self {
        Self { server, client }
    }

    /// Fetches the raw, unfiltered channel listing.
    ///
    /// # Errors
    ///
    /// Transport errors, non-success status, or a body that is not a JSON
    /// array. Malformed entries are skipped, see [`parse_listing`].
    #[instrument(skip(self), fields(server = %self.server.authority()))]
    pub async fn listing(&self) -> Result<Vec<ApiChannel>, FetchError> {
        let url = self.server.channels_url();
        let response = self.client.get(&url).await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.text().await?;
        let listing = parse_listing(&body)?;

        debug!(count = listing.len(), "Channel listing received");
        Ok(listing)
    }
}

#[async_trait]
impl ChannelSource for DvrChannelSource {
    async fn channels(&self) -> Result<Vec<Channel>, FetchError> {
        let listing = self.listing().await?;
        let total = listing.len();
        let channels = filter_tve_channels(listing);

        info!(
            total,
            tve = channels.len(),
            "Loaded TVE channels from {}",
            self.server.authority()
        );
        Ok(channels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(number: &str, name: &str, hidden: bool, source_id: &str) -> ApiChannel {
        ApiChannel {
            number: number.parse().unwrap(),
            name: name.to_string(),
            hidden,
            source_id: source_id.to_string(),
        }
    }

    #[test]
    fn test_urls() {
        let server = DvrServer::new("192.168.1.20", 8089).unwrap();
        assert_eq!(
            server.channels_url(),
            "http://192.168.1.20:8089/api/v1/channels"
        );
        assert_eq!(
            server.stream_url(&ChannelNumber::from(6010_u32)),
            "http://192.168.1.20:8089/devices/ANY/channels/6010/stream.mpg"
        );
        assert_eq!(server.authority(), "192.168.1.20:8089");
    }

    #[test]
    fn test_default_server() {
        assert_eq!(DvrServer::default().authority(), "127.0.0.1:8089");
    }

    #[test]
    fn test_hostname_server() {
        let server = DvrServer::new("dvr.local", 80).unwrap();
        assert_eq!(server.authority(), "dvr.local:80");
        assert_eq!(server.channels_url(), "http://dvr.local/api/v1/channels");
    }

    #[test]
    fn test_invalid_host() {
        assert!(DvrServer::new("", 8089).is_err());
        assert!(DvrServer::new("bad host", 8089).is_err());
        assert!(DvrServer::new("host/path", 8089).is_err());
    }

    #[test]
    fn test_filter_tve_channels() {
        let listing = vec![
            api("6020", "CNN", false, "TVE-Spectrum"),
            api("6010", "ESPN", false, "TVE-Spectrum"),
            api("6030", "Hidden", true, "TVE-Spectrum"),
            api("2", "Local", false, "HDHR-1234"),
            api("7000", "M3U", false, "M3U-Pluto"),
        ];

        let channels = filter_tve_channels(listing);
        let names: Vec<&str> = channels.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["ESPN", "CNN"]);
    }

    #[test]
    fn test_filter_duplicate_numbers_last_wins() {
        let listing = vec![
            api("6010", "ESPN", false, "TVE-A"),
            api("6010", "ESPN HD", false, "TVE-B"),
        ];

        let channels = filter_tve_channels(listing);
        assert_eq!(channels.len(), 1);
        assert_eq!(channels[0].name, "ESPN HD");
    }

    #[test]
    fn test_api_channel_defaults() {
        let entry: ApiChannel =
            serde_json::from_str(r#"{"number":"6010","name":"ESPN","source_id":"TVE-X"}"#)
                .unwrap();
        assert!(!entry.hidden);
        assert!(entry.is_visible_tve());

        let entry: ApiChannel = serde_json::from_str(r#"{"number":5,"name":"X"}"#).unwrap();
        assert!(!entry.is_visible_tve());
    }

    #[test]
    fn test_api_channel_null_fields() {
        let entry: ApiChannel = serde_json::from_str(
            r#"{"number":"6010","name":"ESPN","hidden":null,"source_id":"TVE-X"}"#,
        )
        .unwrap();
        assert!(!entry.hidden);
        assert!(entry.is_visible_tve());

        let entry: ApiChannel =
            serde_json::from_str(r#"{"number":"7001","name":null,"hidden":true,"source_id":null}"#)
                .unwrap();
        assert_eq!(entry.name, "");
        assert!(!entry.is_visible_tve());
    }

    #[test]
    fn test_parse_listing_skips_bad_entries() {
        let listing = parse_listing(
            r#"[
                {"number":"6010","name":"ESPN","source_id":"TVE-Spectrum"},
                {"number":{"major":7},"name":"Broken","source_id":"M3U-Pluto"},
                "not an object",
                {"number":"6002","name":"CNN","source_id":"TVE-Spectrum"}
            ]"#,
        )
        .unwrap();

        let numbers: Vec<&str> = listing.iter().map(|c| c.number.as_str()).collect();
        assert_eq!(numbers, vec!["6010", "6002"]);
    }

    #[test]
    fn test_parse_listing_rejects_non_array() {
        let err = parse_listing(r#"{"error":"nope"}"#).unwrap_err();
        assert!(matches!(err, FetchError::InvalidResponse(_)));
    }
}
