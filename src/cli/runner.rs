//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat, ReadArgs};
use crate::client::{FilePayload, StrapiClient, UploadTarget};
use crate::config::ClientConfig;
use crate::error::{Error, Result, ResultExt};
use crate::query::{flatten_parameter, DocumentQuery, Populate, PublicationState};
use crate::types::{JsonObject, JsonValue};
use serde_json::{json, Value};
use tracing::{debug, info};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command and print its result
    pub async fn run(&self) -> Result<()> {
        let value = self.evaluate().await?;
        self.output_value(&value);
        Ok(())
    }

    /// Run the CLI command and return its result
    pub async fn evaluate(&self) -> Result<Value> {
        if let Commands::Params { name, value } = &self.cli.command {
            return params_value(name, value);
        }

        let config = self.load_config()?;
        debug!("Using API at {}", config.api_url()?);
        let client = StrapiClient::new(&config)?;
        self.execute(&client).await
    }

    /// Load configuration: file (if any), then environment, then `--url`
    pub fn load_config(&self) -> Result<ClientConfig> {
        let mut config = match &self.cli.config {
            Some(path) => ClientConfig::from_file(path)?,
            None => ClientConfig::default(),
        };
        config.apply_env()?;
        if let Some(url) = &self.cli.url {
            config.base_url.clone_from(url);
        }
        config.validate()?;
        Ok(config)
    }

    async fn execute(&self, client: &StrapiClient) -> Result<Value> {
        match &self.cli.command {
            Commands::Health => {
                if client.check_health().await {
                    Ok(json!({ "status": "ok" }))
                } else {
                    Err(Error::Other(format!(
                        "Server at {} is not healthy",
                        client.http().root_url()
                    )))
                }
            }

            Commands::Get {
                api_id,
                document_id,
                read,
            } => {
                let query = read_query(read)?;
                let response = match document_id {
                    Some(id) => client.get_document(api_id, id, &query).await?,
                    None => client.get_single_document(api_id, &query).await?,
                };
                Ok(serde_json::to_value(response)?)
            }

            Commands::List {
                plural_api_id,
                filters,
                sort,
                page,
                page_size,
                all,
                read,
            } => {
                let mut query = read_query(read)?;
                for key in sort {
                    query = query.sort(key.clone());
                }
                if let Some(filters) = filters {
                    let filters: Value =
                        serde_json::from_str(filters).context("Invalid --filters JSON")?;
                    query = query.filters(filters);
                }

                let response = if *all {
                    client.get_all_documents(plural_api_id, &query).await?
                } else {
                    let query = query.page(page.unwrap_or(1), *page_size);
                    client.get_documents(plural_api_id, &query).await?
                };
                info!("Fetched {} documents from {}", response.len(), plural_api_id);
                Ok(serde_json::to_value(response)?)
            }

            Commands::Create {
                plural_api_id,
                data,
            } => {
                let response = client
                    .create_document(plural_api_id, parse_data(data)?)
                    .await?;
                Ok(serde_json::to_value(response)?)
            }

            Commands::Update {
                api_id,
                document_id,
                data,
            } => {
                let data = parse_data(data)?;
                let response = match document_id {
                    Some(id) => client.update_document(api_id, id, data).await?,
                    None => client.put_single_document(api_id, data).await?,
                };
                Ok(serde_json::to_value(response)?)
            }

            Commands::Delete {
                api_id,
                document_id,
            } => {
                let deleted = match document_id {
                    Some(id) => {
                        client.delete_document(api_id, id).await?;
                        format!("{api_id}/{id}")
                    }
                    None => {
                        client.delete_single_document(api_id).await?;
                        api_id.clone()
                    }
                };
                info!("Deleted {}", deleted);
                Ok(json!({ "deleted": deleted }))
            }

            Commands::Upload {
                paths,
                reference,
                ref_id,
                field,
            } => {
                let mut files = Vec::with_capacity(paths.len());
                for path in paths {
                    files.push(FilePayload::from_path(path).await?);
                }

                let target = match (reference, ref_id, field) {
                    (Some(reference), Some(ref_id), Some(field)) => {
                        Some(UploadTarget::new(reference.clone(), *ref_id, field.clone()))
                    }
                    (None, None, None) => None,
                    _ => {
                        return Err(Error::config(
                            "--ref, --ref-id and --field must be given together",
                        ))
                    }
                };

                let uploaded = client.upload_files(files, target.as_ref()).await?;
                info!("Uploaded {} file(s)", uploaded.len());
                Ok(Value::Array(
                    uploaded.into_iter().map(Value::Object).collect(),
                ))
            }

            Commands::Params { name, value } => params_value(name, value),
        }
    }

    /// Output a value
    fn output_value(&self, value: &Value) {
        match self.cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(value).unwrap_or_default());
            }
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(value).unwrap_or_default());
            }
        }
    }
}

/// Build a read query from the shared read options
pub(crate) fn read_query(read: &ReadArgs) -> Result<DocumentQuery> {
    let mut query = DocumentQuery::new();

    match read.populate.as_slice() {
        [] => {}
        [all] if all == "*" => query = query.populate(Populate::All),
        names => query = query.populate(Populate::Relations(names.to_vec())),
    }

    if !read.fields.is_empty() {
        query = query.fields(read.fields.iter().cloned());
    }
    if let Some(locale) = &read.locale {
        query = query.locale(locale.clone());
    }
    if let Some(status) = &read.status {
        query = query.publication_state(status.parse::<PublicationState>()?);
    }

    Ok(query)
}

/// Flatten a JSON value into bracketed query parameters
pub(crate) fn params_value(name: &str, value: &str) -> Result<Value> {
    let value: Value = serde_json::from_str(value).context("Invalid parameter JSON")?;
    Ok(json!(flatten_parameter(name, &value)))
}

/// Parse a `--data` argument into document fields
pub(crate) fn parse_data(data: &str) -> Result<JsonObject> {
    match serde_json::from_str::<JsonValue>(data).context("Invalid --data JSON")? {
        Value::Object(fields) => Ok(fields),
        other => Err(Error::invalid_value(
            "data",
            format!("expected a JSON object, got {other}"),
        )),
    }
}
