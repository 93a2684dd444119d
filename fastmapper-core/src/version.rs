use std::{cmp::Ordering, convert::Infallible, str::FromStr};

/// A Kubernetes API version string, classified for priority ordering
///
/// Follows [Kubernetes version priority](https://kubernetes.io/docs/tasks/extend-kubernetes/custom-resources/custom-resource-definition-versioning/#version-priority):
/// stable versions outrank betas, betas outrank alphas, and anything not
/// matching `vN[alpha|beta[M]]` sorts last, alphabetically.
///
/// ```
/// use fastmapper_core::Version;
/// use std::cmp::Reverse;
/// let mut versions = vec!["v1beta1", "foo", "v2", "v1", "v2alpha1", "v1beta2"];
/// versions.sort_by_cached_key(|v| Reverse(Version::parse(v)));
/// assert_eq!(versions, vec!["v2", "v1", "v1beta2", "v1beta1", "v2alpha1", "foo"]);
/// ```
#[derive(PartialEq, Eq, Debug, Clone)]
pub enum Version {
    /// A major/GA release
    Stable(u32),
    /// A beta release for a specific major version
    Beta(u32, Option<u32>),
    /// An alpha release for a specific major version
    Alpha(u32, Option<u32>),
    /// Any other version string
    Nonconformant(String),
}

impl Version {
    fn try_parse(v: &str) -> Option<Version> {
        let rest = v.strip_prefix('v')?;
        let digits = rest.chars().take_while(char::is_ascii_digit).count();
        let major: u32 = rest[..digits].parse().ok()?;
        let rest = &rest[digits..];
        if rest.is_empty() {
            return Some(Version::Stable(major));
        }
        let minor = |suffix: &str| -> Option<Option<u32>> {
            if suffix.is_empty() {
                Some(None)
            } else {
                suffix.parse().ok().map(Some)
            }
        };
        if let Some(suffix) = rest.strip_prefix("beta") {
            return minor(suffix).map(|m| Version::Beta(major, m));
        }
        if let Some(suffix) = rest.strip_prefix("alpha") {
            return minor(suffix).map(|m| Version::Alpha(major, m));
        }
        None
    }

    /// Infallibly classify a version string
    ///
    /// ```
    /// use fastmapper_core::Version;
    /// assert_eq!(Version::parse("v1beta2"), Version::Beta(1, Some(2)));
    /// assert_eq!(Version::parse("stable"), Version::Nonconformant("stable".into()));
    /// ```
    pub fn parse(v: &str) -> Version {
        Self::try_parse(v).unwrap_or_else(|| Version::Nonconformant(v.to_string()))
    }

    // class rank, higher wins
    fn class(&self) -> u8 {
        match self {
            Version::Stable(_) => 3,
            Version::Beta(..) => 2,
            Version::Alpha(..) => 1,
            Version::Nonconformant(_) => 0,
        }
    }
}

impl FromStr for Version {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Version::parse(s))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        use Version::*;
        match (self, other) {
            (Stable(a), Stable(b)) => a.cmp(b),
            (Beta(a, x), Beta(b, y)) | (Alpha(a, x), Alpha(b, y)) => a.cmp(b).then(x.cmp(y)),
            // lexicographically earlier names rank higher
            (Nonconformant(a), Nonconformant(b)) => b.cmp(a),
            _ => self.class().cmp(&other.class()),
        }
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::Version;
    use std::cmp::Reverse;

    #[test]
    fn classifies_versions() {
        assert_eq!(Version::parse("v1"), Version::Stable(1));
        assert_eq!(Version::parse("v12"), Version::Stable(12));
        assert_eq!(Version::parse("v1beta"), Version::Beta(1, None));
        assert_eq!(Version::parse("v2alpha3"), Version::Alpha(2, Some(3)));
        for odd in ["", "v", "vbeta1", "v1gamma1", "v1beta1x", "1"] {
            assert_eq!(Version::parse(odd), Version::Nonconformant(odd.to_string()));
        }
    }

    #[test]
    fn orders_by_kubernetes_priority() {
        assert!(Version::Stable(1) > Version::Beta(3, Some(1)));
        assert!(Version::Beta(1, None) > Version::Alpha(2, Some(1)));
        assert!(Version::Beta(1, Some(2)) > Version::Beta(1, Some(1)));
        assert!(Version::Alpha(1, None) > Version::Nonconformant("a".into()));

        let mut versions = vec!["foo10", "v11alpha2", "v10", "v3beta1", "foo1", "v2", "v10beta3"];
        versions.sort_by_cached_key(|v| Reverse(Version::parse(v)));
        assert_eq!(versions, vec![
            "v10", "v2", "v10beta3", "v3beta1", "v11alpha2", "foo1", "foo10"
        ]);
    }
}
