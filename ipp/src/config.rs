//!
//! Proxy configuration
//!
use std::{env, fmt, net::IpAddr, path::PathBuf, str::FromStr, time::Duration};

use http::Uri;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::IppError;

const FILE_PREFIX: &str = "file:";
const FORWARD_SCHEMES: &[&str] = &["http", "https", "ipp", "ipps"];

/// Upstream request timeout unless configured otherwise
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Where the dispatcher sends requests
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ForwardTarget {
    /// Upstream IPP server
    Upstream(Uri),
    /// Local sink: requests are answered locally and optionally recorded into the directory
    Local(PathBuf),
}

impl ForwardTarget {
    /// Port of an upstream target, used to complete printer URIs without one
    pub fn port(&self) -> Option<u16> {
        match self {
            ForwardTarget::Upstream(uri) => uri.port_u16(),
            ForwardTarget::Local(_) => None,
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(self, ForwardTarget::Local(_))
    }
}

impl Default for ForwardTarget {
    fn default() -> Self {
        ForwardTarget::Local(env::temp_dir().join("IPP"))
    }
}

impl FromStr for ForwardTarget {
    type Err = IppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(path) = s.strip_prefix(FILE_PREFIX) {
            let path = path.trim_start_matches("//");
            if path.is_empty() {
                return Err(IppError::ValidationError(format!("no directory given in '{s}'")));
            }
            return Ok(ForwardTarget::Local(PathBuf::from(path)));
        }

        let uri: Uri = s.parse()?;
        match uri.scheme_str() {
            Some(scheme) if FORWARD_SCHEMES.contains(&scheme) => Ok(ForwardTarget::Upstream(uri)),
            _ => Err(IppError::ValidationError(format!("unsupported forward target '{s}'"))),
        }
    }
}

impl fmt::Display for ForwardTarget {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ForwardTarget::Upstream(uri) => write!(f, "{uri}"),
            ForwardTarget::Local(path) => write!(f, "{FILE_PREFIX}{}", path.display()),
        }
    }
}

/// Settings of the print proxy
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProxyConfig {
    /// Address to listen on
    pub bind: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Forward target, `file:<dir>` or an upstream URI
    #[cfg_attr(feature = "serde", serde(with = "target_serde"))]
    pub target: ForwardTarget,
    /// Name of the printer advertised by CUPS-Get-Default and CUPS-Get-Printers
    pub printer_name: String,
    /// Timeout for upstream requests
    pub timeout: Duration,
    /// Record requests and responses into the local target directory
    pub record: bool,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        ProxyConfig {
            bind: IpAddr::from([0, 0, 0, 0]),
            port: 631,
            target: ForwardTarget::default(),
            printer_name: "test-printer".to_owned(),
            timeout: DEFAULT_TIMEOUT,
            record: false,
        }
    }
}

impl ProxyConfig {
    /// URI under which the printer is advertised for a client reaching the proxy as `host`
    pub fn printer_uri(&self, host: Option<&str>) -> Result<Uri, IppError> {
        let host = host.unwrap_or("localhost");
        let authority = if host.contains(':') {
            host.to_owned()
        } else {
            format!("{host}:{}", self.port)
        };
        Ok(format!("ipp://{authority}/printers/{}", self.printer_name).parse()?)
    }
}

#[cfg(feature = "serde")]
mod target_serde {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    use super::ForwardTarget;

    pub fn serialize<S>(target: &ForwardTarget, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(target)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<ForwardTarget, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer)?.parse().map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_local_target() {
        let target: ForwardTarget = "file:/var/spool/ipp".parse().unwrap();
        assert_eq!(target, ForwardTarget::Local(PathBuf::from("/var/spool/ipp")));
        assert!(target.is_local());
        assert_eq!(target.port(), None);
        assert_eq!(target.to_string(), "file:/var/spool/ipp");

        let target: ForwardTarget = "file:///tmp/IPP".parse().unwrap();
        assert_eq!(target, ForwardTarget::Local(PathBuf::from("/tmp/IPP")));

        assert!("file:".parse::<ForwardTarget>().is_err());
    }

    #[test]
    fn test_parse_upstream_target() {
        let target: ForwardTarget = "http://printhost:8631".parse().unwrap();
        assert!(!target.is_local());
        assert_eq!(target.port(), Some(8631));

        let target: ForwardTarget = "ipps://printhost/printers/p".parse().unwrap();
        assert_eq!(target.port(), None);

        assert!(matches!(
            "ftp://printhost".parse::<ForwardTarget>(),
            Err(IppError::ValidationError(_))
        ));
        assert!("not a uri".parse::<ForwardTarget>().is_err());
    }

    #[test]
    fn test_defaults() {
        let config = ProxyConfig::default();
        assert_eq!(config.port, 631);
        assert_eq!(config.printer_name, "test-printer");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.target.is_local());
        assert!(!config.record);
    }

    #[test]
    fn test_printer_uri() {
        let config = ProxyConfig::default();
        assert_eq!(
            config.printer_uri(None).unwrap().to_string(),
            "ipp://localhost:631/printers/test-printer"
        );
        assert_eq!(
            config.printer_uri(Some("printhost:8631")).unwrap().to_string(),
            "ipp://printhost:8631/printers/test-printer"
        );
    }
}
