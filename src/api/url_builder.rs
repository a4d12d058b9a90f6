//! Construction of service URLs.
//!
//! A [`UrlBuilderFactory`] knows the deployment (hosted organization or
//! on-premises collection) and produces a [`UrlBuilder`] rooted at it. The
//! builder then appends path sections and query parameters, and finally the
//! `api-version`.

use url::Url;
use url::form_urlencoded::byte_serialize;
use uuid::Uuid;

use crate::error::{ClientError, Result};

const WIT_SECTION: [&str; 2] = ["_apis", "wit"];
const GIT_SECTION: [&str; 2] = ["_apis", "git"];

/// Builds one request URL.
#[derive(Debug, Clone)]
pub struct UrlBuilder {
    url: Url,
    parameters: Vec<(String, String)>,
}

impl UrlBuilder {
    pub fn new(base: Url) -> Self {
        Self {
            url: base,
            parameters: Vec::new(),
        }
    }

    /// Appends one path segment, percent-encoding it as needed.
    pub fn with_section(mut self, section: impl AsRef<str>) -> Self {
        if let Ok(mut segments) = self.url.path_segments_mut() {
            segments.pop_if_empty().push(section.as_ref());
        }
        self
    }

    fn with_sections(self, sections: &[&str]) -> Self {
        sections
            .iter()
            .fold(self, |builder, section| builder.with_section(section))
    }

    /// `_apis/wit/wiql`
    pub fn for_wiql(self) -> Self {
        self.with_sections(&WIT_SECTION).with_section("wiql")
    }

    /// `_apis/wit/wiql/{id}` for a saved query.
    pub fn for_saved_query(self, query_id: Uuid) -> Self {
        self.for_wiql().with_section(query_id.to_string())
    }

    /// `_apis/wit/workitems`
    pub fn for_work_items(self) -> Self {
        self.with_sections(&WIT_SECTION).with_section("workitems")
    }

    /// `_apis/wit/workitems/{id}`
    pub fn for_work_item(self, id: i32) -> Self {
        self.for_work_items().with_section(id.to_string())
    }

    /// `_apis/wit/workitems?ids=1,2,3`
    pub fn for_work_items_batch(self, ids: &[i32]) -> Self {
        let ids = ids
            .iter()
            .map(i32::to_string)
            .collect::<Vec<_>>()
            .join(",");
        self.for_work_items().with_query_parameter("ids", ids)
    }

    /// `_apis/wit/fields`
    pub fn for_work_item_fields(self) -> Self {
        self.with_sections(&WIT_SECTION).with_section("fields")
    }

    /// `{project}/_apis/git/repositories/{repository}/pullrequests`
    pub fn for_pull_requests(self, project: &str, repository: &str) -> Self {
        self.with_section(project)
            .with_sections(&GIT_SECTION)
            .with_section("repositories")
            .with_section(repository)
            .with_section("pullrequests")
    }

    /// `{project}/_apis/git/repositories/{repository}/pullrequests/{id}`
    pub fn for_pull_request(self, project: &str, repository: &str, id: i32) -> Self {
        self.for_pull_requests(project, repository)
            .with_section(id.to_string())
    }

    /// `_apis/git/pullrequests/{id}`, resolving the repository server-side.
    pub fn for_pull_request_by_id(self, id: i32) -> Self {
        self.with_sections(&GIT_SECTION)
            .with_section("pullrequests")
            .with_section(id.to_string())
    }

    /// `_apis/identities`
    pub fn for_identities(self) -> Self {
        self.with_section("_apis").with_section("identities")
    }

    pub fn with_query_parameter(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.parameters.push((name.into(), value.to_string()));
        self
    }

    /// Adds the parameter only when `value` is present and non-empty.
    pub fn with_optional_parameter<V: ToString>(self, name: &str, value: Option<V>) -> Self {
        match value.map(|v| v.to_string()) {
            Some(value) if !value.is_empty() => self.with_query_parameter(name, value),
            _ => self,
        }
    }

    /// Finishes the URL, appending `api-version` last.
    ///
    /// Parameter names are emitted verbatim so `$skip`, `$top` and
    /// `searchCriteria.status` keep their literal form; values are
    /// form-encoded.
    pub fn build(self, api_version: &str) -> Url {
        let mut url = self.url;
        let query = self
            .parameters
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
            .chain(std::iter::once(("api-version", api_version)))
            .map(|(name, value)| format!("{}={}", name, byte_serialize(value.as_bytes()).collect::<String>()))
            .collect::<Vec<_>>()
            .join("&");
        url.set_query(Some(&query));
        url
    }
}

/// Produces URL builders for one deployment.
pub trait UrlBuilderFactory: Send + Sync {
    /// A builder rooted at the deployment, optionally on a service sub-domain
    /// such as `vssps` for identities.
    fn create(&self, sub_domain: Option<&str>) -> Result<UrlBuilder>;
}

/// Hosted organizations: `https://{instance}.visualstudio.com`, and
/// `https://{instance}.{sub_domain}.visualstudio.com` for service sub-domains.
#[derive(Debug, Clone)]
pub struct OnlineUrlBuilderFactory {
    instance: String,
}

impl OnlineUrlBuilderFactory {
    pub fn new(instance: impl Into<String>) -> Result<Self> {
        let instance = instance.into();
        let valid = !instance.is_empty()
            && instance
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-');
        if !valid {
            return Err(ClientError::invalid_argument(
                "instance",
                format!("'{}' is not a valid organization name", instance),
            ));
        }
        Ok(Self { instance })
    }

    pub fn instance(&self) -> &str {
        &self.instance
    }
}

impl UrlBuilderFactory for OnlineUrlBuilderFactory {
    fn create(&self, sub_domain: Option<&str>) -> Result<UrlBuilder> {
        let host = match sub_domain {
            Some(sub_domain) => format!("{}.{}.visualstudio.com", self.instance, sub_domain),
            None => format!("{}.visualstudio.com", self.instance),
        };
        let base = Url::parse(&format!("https://{}", host))
            .map_err(|e| ClientError::invalid_argument("sub_domain", e.to_string()))?;
        Ok(UrlBuilder::new(base))
    }
}

/// On-premises collections, e.g. `https://tfs.local/tfs/DefaultCollection`.
///
/// Sub-domains do not exist on-premises and are ignored.
#[derive(Debug, Clone)]
pub struct OnPremUrlBuilderFactory {
    base: Url,
}

impl OnPremUrlBuilderFactory {
    pub fn new(base: Url) -> Result<Self> {
        if base.cannot_be_a_base() || !matches!(base.scheme(), "http" | "https") {
            return Err(ClientError::invalid_argument(
                "base_url",
                format!("'{}' is not an http(s) collection URL", base),
            ));
        }
        Ok(Self { base })
    }
}

impl UrlBuilderFactory for OnPremUrlBuilderFactory {
    fn create(&self, _sub_domain: Option<&str>) -> Result<UrlBuilder> {
        Ok(UrlBuilder::new(self.base.clone()))
    }
}
