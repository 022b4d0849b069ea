use reqwest::{Client, Method, Response, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: String,
    #[serde(rename = "employee_name")]
    pub name: String,
    #[serde(rename = "employee_salary")]
    pub salary: u32,
    #[serde(rename = "employee_age")]
    pub age: u32,
    #[serde(rename = "employee_title")]
    pub title: String,
    #[serde(rename = "employee_email", default)]
    pub email: String,
}

/// Body for `POST /`. Fields are optional so invalid payloads can be sent on purpose.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CreateEmployee {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl CreateEmployee {
    pub fn new(name: &str, salary: i64, age: i64, title: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            salary: Some(salary),
            age: Some(age),
            title: Some(title.to_string()),
        }
    }
}

#[derive(Debug, Error)]
pub enum SdkError {
    /// The gateway answered with a non-2xx status.
    #[error("gateway returned error status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid gateway URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl SdkError {
    pub fn status(&self) -> Option<u16> {
        match self {
            SdkError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Parsed error body, when it is JSON.
    pub fn body_json(&self) -> Option<serde_json::Value> {
        match self {
            SdkError::Status { body, .. } => serde_json::from_str(body).ok(),
            _ => None,
        }
    }
}

pub struct GatewayClient {
    client: Client,
    gateway_url: String,
}

impl GatewayClient {
    pub fn new(gateway_url: &str) -> Self {
        Self {
            client: Client::new(),
            gateway_url: gateway_url.trim_end_matches('/').to_string(),
        }
    }

    /// Gateway URL with each segment percent-encoded as one path segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, SdkError> {
        let mut url = Url::parse(&self.gateway_url)?;
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<&CreateEmployee>,
    ) -> Result<T, SdkError> {
        let mut request = self.client.request(method, self.endpoint(segments)?);
        if let Some(body) = body {
            request = request.json(body);
        }
        Self::read(request.send().await?).await
    }

    async fn read<T: DeserializeOwned>(resp: Response) -> Result<T, SdkError> {
        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            return Err(SdkError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        Ok(serde_json::from_str(&text)?)
    }

    pub async fn list(&self) -> Result<Vec<Employee>, SdkError> {
        self.call(Method::GET, &[""], None).await
    }

    pub async fn get(&self, id: &str) -> Result<Employee, SdkError> {
        self.call(Method::GET, &[id], None).await
    }

    pub async fn search(&self, fragment: &str) -> Result<Vec<Employee>, SdkError> {
        self.call(Method::GET, &["search", fragment], None).await
    }

    pub async fn highest_salary(&self) -> Result<u32, SdkError> {
        self.call(Method::GET, &["highestSalary"], None).await
    }

    pub async fn top_ten_names(&self) -> Result<Vec<String>, SdkError> {
        self.call(Method::GET, &["topTenHighestEarningEmployeeNames"], None)
            .await
    }

    pub async fn create(&self, input: &CreateEmployee) -> Result<Employee, SdkError> {
        self.call(Method::POST, &[""], Some(input)).await
    }

    /// Returns the deleted employee's name.
    pub async fn delete(&self, id: &str) -> Result<String, SdkError> {
        self.call(Method::DELETE, &[id], None).await
    }

    /// GET an already-encoded path, returning the response untouched.
    pub async fn get_raw(&self, path: &str) -> Result<Response, reqwest::Error> {
        self.client
            .get(format!("{}{}", self.gateway_url, path))
            .send()
            .await
    }
}
