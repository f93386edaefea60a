use reqwest::{Response, StatusCode};
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::RemoteStore;
use crate::cache::Record;
use crate::config::RemoteConfig;
use crate::error::{Error, Result};

/// REST client for the task and user collections
#[derive(Clone)]
pub struct HttpRemote {
  client: reqwest::Client,
  base: Url,
}

impl HttpRemote {
  pub fn new(config: &RemoteConfig) -> Result<Self> {
    let mut builder = reqwest::Client::builder();
    if let Some(secs) = config.timeout_secs {
      builder = builder.timeout(Duration::from_secs(secs));
    }
    let client = builder.build()?;
    let base = Url::parse(&config.url)?;
    if base.cannot_be_a_base() {
      return Err(Error::Config(format!(
        "Remote URL cannot be a base: {}",
        config.url
      )));
    }

    Ok(Self { client, base })
  }

  /// `{base}/{collection}`, keeping any path prefix on the base URL
  fn collection_url<T: Record>(&self) -> Result<Url> {
    self.url_for(&[T::collection()])
  }

  /// `{base}/{collection}/{id}`, with the id percent-encoded
  fn item_url<T: Record>(&self, id: &str) -> Result<Url> {
    self.url_for(&[T::collection(), id])
  }

  fn url_for(&self, segments: &[&str]) -> Result<Url> {
    let mut url = self.base.clone();
    url
      .path_segments_mut()
      .map_err(|_| Error::Url(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
      .pop_if_empty()
      .extend(segments);
    Ok(url)
  }
}

/// Turn a non-2xx answer into an error.
fn check_status(response: Response) -> Result<Response> {
  let status = response.status();
  if status.is_success() {
    Ok(response)
  } else {
    Err(Error::Status(status.as_u16()))
  }
}

impl RemoteStore for HttpRemote {
  async fn list<T: Record>(&self) -> Result<Vec<T>> {
    let url = self.collection_url::<T>()?;
    debug!(%url, "GET collection");

    let response = check_status(self.client.get(url).send().await?)?;
    Ok(response.json().await?)
  }

  async fn create<T: Record>(&self, entity: &T) -> Result<T> {
    let url = self.collection_url::<T>()?;
    debug!(%url, "POST entity");

    let response = check_status(self.client.post(url).json(entity).send().await?)?;
    Ok(response.json().await?)
  }

  async fn update<T: Record>(&self, id: &str, entity: &T) -> Result<T> {
    let url = self.item_url::<T>(id)?;
    debug!(%url, "PUT entity");

    let response = check_status(self.client.put(url).json(entity).send().await?)?;
    Ok(response.json().await?)
  }

  async fn delete<T: Record>(&self, id: &str) -> Result<()> {
    let url = self.item_url::<T>(id)?;
    debug!(%url, "DELETE entity");

    let response = self.client.delete(url).send().await?;
    // json-server answers 200 with `{}`, others 204 with no body
    if response.status() == StatusCode::NO_CONTENT {
      return Ok(());
    }
    check_status(response)?;
    Ok(())
  }
}
