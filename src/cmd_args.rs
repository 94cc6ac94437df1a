use std::ffi::OsString;

pub use clap::Parser;

use crate::gallery::{FacetKind, QueryState};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct ClapArgs {
    /// Profile name
    /// Profile to read the catalog server and API key from. Default is 'default'.
    /// If the profile is not configured, the default server is used without a key.
    #[clap(short = 'p', long, default_value = "default", help = "profile name")]
    profile: String,

    #[clap(short = 'v', long, help = "log request details to stderr")]
    verbose: bool,

    #[clap(short = 'q', long, help = "initial search text")]
    query: Option<String>,

    #[clap(long, help = "initial classification filter")]
    classification: Option<String>,

    #[clap(long, help = "initial century filter")]
    century: Option<String>,

    #[clap(long, help = "initial culture filter")]
    culture: Option<String>,

    #[clap(long, help = "print the first page of results and exit")]
    once: bool,
}

#[derive(Debug, Clone)]
pub struct CommandLineArgs {
    profile: String,
    verbose: bool,
    once: bool,
    initial_query: QueryState,
}

impl CommandLineArgs {
    pub fn parse() -> Self {
        Self::from(ClapArgs::parse())
    }

    pub fn parse_from<I, T>(itr: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Self::from(ClapArgs::parse_from(itr))
    }

    pub fn profile(&self) -> &String {
        &self.profile
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    pub fn once(&self) -> bool {
        self.once
    }

    /// Query state assembled from the search and filter flags
    pub fn initial_query(&self) -> &QueryState {
        &self.initial_query
    }
}

impl From<ClapArgs> for CommandLineArgs {
    fn from(args: ClapArgs) -> Self {
        let mut initial_query = QueryState::new();
        if let Some(text) = args.query {
            initial_query.set_search_text(text);
        }
        for (kind, value) in [
            (FacetKind::Classification, args.classification),
            (FacetKind::Century, args.century),
            (FacetKind::Culture, args.culture),
        ] {
            if let Some(value) = value {
                initial_query.set_filter(kind, value);
            }
        }

        Self {
            profile: args.profile,
            verbose: args.verbose,
            once: args.once,
            initial_query,
        }
    }
}
