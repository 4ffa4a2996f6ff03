//! Newtype resource identifiers.
//!
//! Every daemon resource that is addressed by name or ID in a request path
//! is represented as a distinct newtype wrapping a non-empty string. This
//! prevents passing a [`VolumeName`] where an [`InstanceName`] is expected,
//! and guarantees that an empty identifier is rejected locally instead of
//! producing a request against a collection route.

use serde::{Deserialize, Serialize};

use crate::ClientError;

// ---------------------------------------------------------------------------
// Macro for String-wrapped newtypes.
// Generates: struct, new() returning Option<Self>, parse() returning a
// validation error, as_str(), Display.
// ---------------------------------------------------------------------------
macro_rules! string_id {
    (
        $(#[$attr:meta])*
        $name:ident => $label:literal
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier, returning `None` if the value is empty.
            pub fn new(value: impl Into<String>) -> Option<Self> {
                let v = value.into();
                if v.is_empty() { None } else { Some(Self(v)) }
            }

            /// Creates a new identifier, rejecting empty values with
            /// [`ClientError::InvalidRequest`].
            pub fn parse(value: impl Into<String>) -> Result<Self, ClientError> {
                Self::new(value)
                    .ok_or_else(|| ClientError::invalid(concat!($label, " must not be empty")))
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Compute
// ---------------------------------------------------------------------------

string_id! {
    /// Name of a workstation instance, unique per daemon.
    InstanceName => "instance name"
}

string_id! {
    /// Name of a workstation template (e.g. `"python-ml"`).
    TemplateName => "template name"
}

string_id! {
    /// Identifier returned by the daemon when an image build is started.
    ///
    /// Used to poll the build until it completes.
    AmiCreationId => "AMI creation ID"
}

// ---------------------------------------------------------------------------
// Storage
// ---------------------------------------------------------------------------

string_id! {
    /// Name of a shared (network file system) volume.
    VolumeName => "volume name"
}

string_id! {
    /// Name of a block storage volume.
    StorageName => "storage name"
}

// ---------------------------------------------------------------------------
// Projects and policies
// ---------------------------------------------------------------------------

string_id! {
    /// Identifies a project.
    ProjectId => "project ID"
}

string_id! {
    /// Identifies a user that can be a project member.
    UserId => "user ID"
}

string_id! {
    /// Identifies an idle (hibernation) policy template.
    PolicyId => "policy ID"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_identifiers_are_rejected() {
        assert!(InstanceName::new("").is_none());
        let err = ProjectId::parse("").unwrap_err();
        assert_eq!(err.to_string(), "invalid request: project ID must not be empty");
    }

    #[test]
    fn identifiers_display_their_value() {
        let name = InstanceName::parse("ml-box").unwrap();
        assert_eq!(name.as_str(), "ml-box");
        assert_eq!(name.to_string(), "ml-box");
    }
}
