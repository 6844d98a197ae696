//! Run configuration and pre-flight validation.
//!
//! Everything here fails before the first network call: a bad URL,
//! an incomplete TLS material set, or certificate files that do not
//! exist or do not look like PEM.

use std::fs;
use std::path::{Path, PathBuf};

use clap::ValueEnum;

use crate::errors::{ReportError, ReportResult};
use crate::puppetdb::query::FactFamily;

/// Which report to produce.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportKind {
    #[value(name = "user-reports", alias = "users")]
    Users,
    #[value(name = "group-reports", alias = "groups")]
    Groups,
}

impl ReportKind {
    pub fn family(self) -> FactFamily {
        match self {
            ReportKind::Users => FactFamily::Users,
            ReportKind::Groups => FactFamily::Groups,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ReportKind::Users => "user-reports",
            ReportKind::Groups => "group-reports",
        }
    }
}

/// Output format of the rendered report.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Csv,
    Html,
}

/// Mutual TLS material: client certificate, client key, CA certificate.
#[derive(Clone, Debug)]
pub struct TlsMaterial {
    pub cert: PathBuf,
    pub key: PathBuf,
    pub ca_cert: PathBuf,
}

/// The base URL must be an absolute http(s) URL.
pub fn validate_url(url: &str) -> ReportResult<()> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(ReportError::Config(format!(
            "URL {url:?} must start with http:// or https://"
        )))
    }
}

/// Assemble the TLS material set. The three files are all-or-nothing and
/// each must be readable and look like PEM.
pub fn tls_material(
    cert: Option<PathBuf>,
    key: Option<PathBuf>,
    ca_cert: Option<PathBuf>,
) -> ReportResult<Option<TlsMaterial>> {
    match (cert, key, ca_cert) {
        (None, None, None) => Ok(None),
        (Some(cert), Some(key), Some(ca_cert)) => {
            for path in [&cert, &key, &ca_cert] {
                check_pem(path)?;
            }
            Ok(Some(TlsMaterial { cert, key, ca_cert }))
        }
        _ => Err(ReportError::Config(
            "client certificate, key, and CA certificate must be supplied together".to_string(),
        )),
    }
}

fn check_pem(path: &Path) -> ReportResult<()> {
    let contents = fs::read_to_string(path)
        .map_err(|e| ReportError::Config(format!("cannot read {}: {e}", path.display())))?;
    if !contents.contains("-----BEGIN") {
        return Err(ReportError::Config(format!(
            "{} does not look like a PEM file",
            path.display()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn pem_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn accepts_http_and_https_urls() {
        assert!(validate_url("https://puppetdb.example.com:8081").is_ok());
        assert!(validate_url("http://localhost:8080").is_ok());
        assert!(validate_url("puppetdb.example.com").is_err());
    }

    #[test]
    fn no_tls_material_is_valid() {
        assert!(tls_material(None, None, None).unwrap().is_none());
    }

    #[test]
    fn partial_tls_material_is_rejected() {
        let err = tls_material(Some(PathBuf::from("cert.pem")), None, None).unwrap_err();
        assert!(err.to_string().contains("together"));
    }

    #[test]
    fn complete_pem_set_is_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let pem = "-----BEGIN CERTIFICATE-----\nabc\n-----END CERTIFICATE-----\n";
        let cert = pem_file(dir.path(), "cert.pem", pem);
        let key = pem_file(dir.path(), "key.pem", pem);
        let ca = pem_file(dir.path(), "ca.pem", pem);
        assert!(tls_material(Some(cert), Some(key), Some(ca))
            .unwrap()
            .is_some());
    }

    #[test]
    fn non_pem_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let pem = "-----BEGIN CERTIFICATE-----\nabc\n-----END CERTIFICATE-----\n";
        let cert = pem_file(dir.path(), "cert.pem", pem);
        let key = pem_file(dir.path(), "key.pem", pem);
        let ca = pem_file(dir.path(), "ca.pem", "not a certificate");
        let err = tls_material(Some(cert), Some(key), Some(ca)).unwrap_err();
        assert!(err.to_string().contains("PEM"));
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let pem = "-----BEGIN CERTIFICATE-----\nabc\n-----END CERTIFICATE-----\n";
        let cert = pem_file(dir.path(), "cert.pem", pem);
        let key = pem_file(dir.path(), "key.pem", pem);
        let ca = dir.path().join("absent.pem");
        assert!(tls_material(Some(cert), Some(key), Some(ca)).is_err());
    }
}
