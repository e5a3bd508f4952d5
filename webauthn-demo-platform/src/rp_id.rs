use std::borrow::Cow;

use url::Url;
use webauthn_demo_client::PlatformError;

/// Checks the RP ID a request claims against the origin it came from.
pub(crate) struct RpIdVerifier<P> {
    tld_provider: P,
    allows_insecure_localhost: bool,
}

impl<P> RpIdVerifier<P>
where
    P: public_suffix::EffectiveTLDProvider + Sync + 'static,
{
    pub fn new(tld_provider: P) -> Self {
        Self {
            tld_provider,
            allows_insecure_localhost: false,
        }
    }

    pub fn allows_insecure_localhost(mut self, is_allowed: bool) -> Self {
        self.allows_insecure_localhost = is_allowed;
        self
    }

    /// Resolve the effective RP ID of a request.
    ///
    /// The RP ID must equal the origin's domain or be a dot separated suffix of it, and must be a
    /// registrable domain rather than a public suffix. Without a claimed RP ID the origin's domain
    /// is used. Only `https` origins are accepted, apart from `localhost` when
    /// `allows_insecure_localhost` is set.
    pub fn assert_domain<'a>(
        &self,
        origin: &'a Url,
        rp_id: Option<&'a str>,
    ) -> Result<&'a str, PlatformError> {
        let domain = origin.domain().ok_or(PlatformError::Security)?;

        let effective_domain = match rp_id {
            Some(rp_id) if is_suffix_of(rp_id, domain) => rp_id,
            Some(rp_id) => {
                log::warn!("origin {origin} may not claim RP ID {rp_id}");
                return Err(PlatformError::Security);
            }
            None => domain,
        };

        if effective_domain == "localhost" {
            return if self.allows_insecure_localhost {
                Ok(effective_domain)
            } else {
                Err(PlatformError::Security)
            };
        }

        if !origin.scheme().eq_ignore_ascii_case("https") {
            return Err(PlatformError::Security);
        }

        if decode_host(effective_domain)
            .as_ref()
            .and_then(|host| self.tld_provider.effective_tld_plus_one(host).ok())
            .is_none()
        {
            log::warn!("RP ID {effective_domain} is not a registrable domain");
            return Err(PlatformError::Security);
        }

        Ok(effective_domain)
    }
}

fn is_suffix_of(rp_id: &str, domain: &str) -> bool {
    domain == rp_id
        || domain
            .strip_suffix(rp_id)
            .is_some_and(|prefix| prefix.ends_with('.'))
}

/// Punycode labels are turned back into unicode before the public suffix lookup.
fn decode_host(host: &str) -> Option<Cow<'_, str>> {
    if host.split('.').any(|label| label.starts_with("xn--")) {
        let (decoded, result) = idna::domain_to_unicode(host);
        result.ok().map(|_| Cow::from(decoded))
    } else {
        Some(Cow::from(host))
    }
}
