//! Client/daemon version negotiation.

use api::{ClientError, DaemonControl, RequestContext, Result, Version};

/// Checks a client version against the version a daemon reports.
///
/// Negotiation costs one `GET /api/v1/status` round trip per call; nothing is
/// cached, so a daemon restarted on a different version is noticed on the
/// next check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionNegotiator {
    client: Version,
}

impl VersionNegotiator {
    /// Parses `client_version` leniently (see [`Version::parse_lenient`]).
    pub fn new(client_version: &str) -> Self {
        Self {
            client: Version::parse_lenient(client_version),
        }
    }

    pub fn client_version(&self) -> Version {
        self.client
    }

    /// Applies the compatibility rule to a daemon version string.
    pub fn check(&self, daemon_version: &str) -> Result<Version> {
        let daemon = Version::parse_lenient(daemon_version);
        self.client.negotiate(daemon)?;
        Ok(daemon)
    }

    /// Fetches the daemon's status through `daemon` and checks its version.
    ///
    /// Transport and HTTP failures of the status call are returned as is.
    pub async fn negotiate<D>(&self, ctx: &RequestContext, daemon: &D) -> Result<Version>
    where
        D: DaemonControl + ?Sized,
    {
        let status = daemon.status(ctx).await?;
        // Only an absent field is "missing"; an empty string parses as 0.0.0.
        let reported = status
            .version
            .as_deref()
            .ok_or(ClientError::MissingDaemonVersion)?;

        let version = self.check(reported.trim())?;
        tracing::debug!(
            client = %self.client,
            daemon = %version,
            "daemon version is compatible"
        );
        Ok(version)
    }
}

#[cfg(test)]
mod tests {
    use api::{Incompatibility, Remedy};

    use super::*;

    fn rejection(client: &str, daemon: &str) -> (Incompatibility, Remedy) {
        match VersionNegotiator::new(client).check(daemon) {
            Err(ClientError::VersionIncompatible { reason, remedy, .. }) => (reason, remedy),
            other => panic!("expected incompatibility, got {other:?}"),
        }
    }

    #[test]
    fn older_client_minor_is_compatible() {
        assert!(VersionNegotiator::new("1.2.0").check("1.3.0").is_ok());
    }

    #[test]
    fn patch_is_ignored() {
        let version = VersionNegotiator::new("v1.2.0").check("v1.2.5").unwrap();
        assert_eq!(version, Version::new(1, 2, 5));
    }

    #[test]
    fn newer_client_minor_asks_for_a_daemon_upgrade() {
        assert_eq!(
            rejection("1.3.0", "1.2.0"),
            (Incompatibility::ClientAhead, Remedy::UpgradeDaemon)
        );
    }

    #[test]
    fn major_mismatch_names_the_side_to_upgrade() {
        assert_eq!(
            rejection("2.0.0", "1.9.9"),
            (Incompatibility::MajorMismatch, Remedy::UpgradeDaemon)
        );
        assert_eq!(
            rejection("1.9.9", "2.0.0"),
            (Incompatibility::MajorMismatch, Remedy::UpgradeClient)
        );
    }

    #[test]
    fn unparsable_versions_degrade_to_zero() {
        // "7" has a single component and parses as 0.0.0.
        assert_eq!(VersionNegotiator::new("7").client_version(), Version::default());
        assert!(VersionNegotiator::new("garbage").check("0.0.1").is_ok());
    }
}
