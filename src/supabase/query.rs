//! Table queries against the REST interface.
//!
//! Filters use the service's `column=op.value` query syntax; embedded
//! resources go in the select list (`clinics!inner(status)`) and can be
//! filtered with dotted column names (`clinics.status`).

use reqwest::{Method, RequestBuilder};
use serde::{de::DeserializeOwned, Serialize};

use super::{Client, ClientError};

pub struct Table<'a> {
    client: &'a Client,
    name:   String,
}

impl<'a> Table<'a> {
    pub(super) fn new(client: &'a Client, name: &str) -> Self {
        Self { client, name: name.to_owned() }
    }

    pub fn select(self, columns: &str) -> Select<'a> {
        Select {
            client:  self.client,
            table:   self.name,
            columns: columns.to_owned(),
            filters: Vec::new(),
            order:   None,
            limit:   None,
        }
    }

    /// Insert one row and read back the stored representation.
    pub fn insert<T: Serialize>(self, row: &T) -> Result<Insert<'a>, ClientError> {
        Ok(Insert {
            client: self.client,
            table:  self.name,
            body:   to_value(row)?,
        })
    }

    pub fn upsert<T: Serialize>(self, row: &T) -> Result<Upsert<'a>, ClientError> {
        Ok(Upsert {
            client:            self.client,
            table:             self.name,
            body:              to_value(row)?,
            on_conflict:       None,
            ignore_duplicates: false,
        })
    }
}

fn to_value<T: Serialize>(row: &T) -> Result<serde_json::Value, ClientError> {
    serde_json::to_value(row)
        .map_err(|e| ClientError::InvalidConfig(format!("row is not serializable: {e}")))
}

// ── Select ────────────────────────────────────────────────────

pub struct Select<'a> {
    client:  &'a Client,
    table:   String,
    columns: String,
    filters: Vec<(String, String)>,
    order:   Option<String>,
    limit:   Option<usize>,
}

impl<'a> Select<'a> {
    pub fn eq(mut self, column: &str, value: impl std::fmt::Display) -> Self {
        self.filters.push((column.to_owned(), format!("eq.{value}")));
        self
    }

    pub fn order(mut self, column: &str, ascending: bool) -> Self {
        let dir = if ascending { "asc" } else { "desc" };
        self.order = Some(format!("{column}.{dir}"));
        self
    }

    pub fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }

    pub(crate) fn build(&self) -> RequestBuilder {
        let mut params: Vec<(String, String)> = vec![("select".into(), self.columns.clone())];
        params.extend(self.filters.iter().cloned());
        if let Some(ref order) = self.order {
            params.push(("order".into(), order.clone()));
        }
        if let Some(n) = self.limit {
            params.push(("limit".into(), n.to_string()));
        }
        self.client
            .request(Method::GET, self.client.rest_url(&self.table))
            .query(&params)
    }

    pub async fn execute<T: DeserializeOwned>(self) -> Result<Vec<T>, ClientError> {
        let resp = Client::check(self.build().send().await?).await?;
        Ok(resp.json::<Vec<T>>().await?)
    }

    /// Zero rows is `None`; more than one is an error.
    pub async fn maybe_single<T: DeserializeOwned>(self) -> Result<Option<T>, ClientError> {
        let mut rows = self.execute::<T>().await?;
        match rows.len() {
            0 => Ok(None),
            1 => Ok(rows.pop()),
            n => Err(ClientError::RowCount(n)),
        }
    }
}

// ── Insert ────────────────────────────────────────────────────

pub struct Insert<'a> {
    client: &'a Client,
    table:  String,
    body:   serde_json::Value,
}

impl<'a> Insert<'a> {
    pub(crate) fn build(&self) -> RequestBuilder {
        self.client
            .request(Method::POST, self.client.rest_url(&self.table))
            .query(&[("select", "*")])
            .header("Prefer", "return=representation")
            .json(&self.body)
    }

    pub async fn single<T: DeserializeOwned>(self) -> Result<T, ClientError> {
        let resp = Client::check(self.build().send().await?).await?;
        let mut rows = resp.json::<Vec<T>>().await?;
        match rows.len() {
            1 => rows.pop().ok_or(ClientError::RowCount(0)),
            n => Err(ClientError::RowCount(n)),
        }
    }
}

// ── Upsert ────────────────────────────────────────────────────

pub struct Upsert<'a> {
    client:            &'a Client,
    table:             String,
    body:              serde_json::Value,
    on_conflict:       Option<String>,
    ignore_duplicates: bool,
}

impl<'a> Upsert<'a> {
    pub fn on_conflict(mut self, columns: &str) -> Self {
        self.on_conflict = Some(columns.to_owned());
        self
    }

    /// Leave existing rows untouched instead of merging into them.
    pub fn ignore_duplicates(mut self) -> Self {
        self.ignore_duplicates = true;
        self
    }

    pub(crate) fn build(&self) -> RequestBuilder {
        let resolution = if self.ignore_duplicates {
            "resolution=ignore-duplicates"
        } else {
            "resolution=merge-duplicates"
        };
        let mut req = self
            .client
            .request(Method::POST, self.client.rest_url(&self.table))
            .header("Prefer", format!("{resolution},return=minimal"))
            .json(&self.body);
        if let Some(ref columns) = self.on_conflict {
            req = req.query(&[("on_conflict", columns.as_str())]);
        }
        req
    }

    pub async fn execute(self) -> Result<(), ClientError> {
        Client::check(self.build().send().await?).await?;
        Ok(())
    }
}
