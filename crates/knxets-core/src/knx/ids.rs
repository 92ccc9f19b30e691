use serde::{Deserialize, Serialize};
use std::fmt;

/// Declares an opaque string identifier so that ids of different entities
/// cannot be mixed up at call sites.
macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }
    };
}

string_id!(
    /// Project identifier, e.g. `P-0123`. Also the project directory inside the archive.
    ProjectId
);
string_id!(
    /// Single digit naming an installation file (`P-0123/0.xml` has id `0`).
    InstallationId
);
string_id!(AreaId);
string_id!(LineId);
string_id!(DeviceInstanceId);
string_id!(GroupRangeId);
string_id!(GroupAddressId);
string_id!(
    /// Manufacturer identifier, e.g. `M-0083`.
    ManufacturerId
);
string_id!(ApplicationProgramId);
string_id!(ComObjectId);
string_id!(ComObjectRefId);
