//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Strapi content API client
#[derive(Parser, Debug)]
#[command(name = "strapi-client")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Client configuration file (YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Server root URL, overrides the config file and STRAPI_URL
    #[arg(short, long, global = true)]
    pub url: Option<String>,

    /// Output format
    #[arg(short, long, global = true, default_value = "pretty")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by read commands
#[derive(clap::Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadArgs {
    /// Relations to populate (`*` for every first-level relation)
    #[arg(short, long, value_delimiter = ',')]
    pub populate: Vec<String>,

    /// Scalar fields to return
    #[arg(long, value_delimiter = ',')]
    pub fields: Vec<String>,

    /// Locale of localized content
    #[arg(long)]
    pub locale: Option<String>,

    /// Publication state (`live` or `preview`)
    #[arg(long)]
    pub status: Option<String>,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check that the server answers its health probe
    Health,

    /// Get one document, or a single type when no document id is given
    Get {
        /// Plural API id of a collection type, or singular API id of a single type
        api_id: String,

        /// Document id
        document_id: Option<String>,

        #[command(flatten)]
        read: ReadArgs,
    },

    /// List documents of a collection type
    List {
        /// Plural API id
        plural_api_id: String,

        /// Filters as JSON (e.g. '{"title":{"$eq":"Hello"}}')
        #[arg(long)]
        filters: Option<String>,

        /// Sort keys (e.g. `title:asc`)
        #[arg(short, long)]
        sort: Vec<String>,

        /// Page number
        #[arg(long, conflicts_with = "all")]
        page: Option<u32>,

        /// Entries per page
        #[arg(long, default_value = "25")]
        page_size: u32,

        /// Fetch every page
        #[arg(long)]
        all: bool,

        #[command(flatten)]
        read: ReadArgs,
    },

    /// Create a document
    Create {
        /// Plural API id
        plural_api_id: String,

        /// Document fields as JSON
        #[arg(short, long)]
        data: String,
    },

    /// Update a document, or replace a single type when no document id is given
    Update {
        /// Plural API id of a collection type, or singular API id of a single type
        api_id: String,

        /// Document id
        document_id: Option<String>,

        /// Document fields as JSON
        #[arg(short, long)]
        data: String,
    },

    /// Delete a document, or a single type when no document id is given
    Delete {
        /// Plural API id of a collection type, or singular API id of a single type
        api_id: String,

        /// Document id
        document_id: Option<String>,
    },

    /// Upload files to the media library
    Upload {
        /// Files to upload
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Content type UID of the entry to link to (e.g. `api::article.article`)
        #[arg(long = "ref", requires_all = ["ref_id", "field"])]
        reference: Option<String>,

        /// Numeric id of the entry to link to
        #[arg(long)]
        ref_id: Option<u64>,

        /// Field of the entry to link to
        #[arg(long)]
        field: Option<String>,
    },

    /// Print the bracketed query parameters of a JSON value
    Params {
        /// Parameter name (e.g. `filters`)
        name: String,

        /// Parameter value as JSON
        value: String,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Compact JSON on one line
    Json,
    /// Indented JSON
    Pretty,
}
