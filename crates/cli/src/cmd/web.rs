//! Browser commands: search, page summaries and downloads into memory.

use std::io::{self, BufRead};

use anyhow::{Context, Result, bail};
use clap::Subcommand;
use tracing::debug;

use sussyos_lib::archive::ArchiveStore;
use sussyos_lib::web::{FetchService, PageDetails, ensure_image, url_to_filename, verify_sha256};

use crate::output::{print_info, print_item, print_stat, print_success, print_warning, symbols};
use crate::prompts::ask;
use crate::session::Session;

#[derive(Subcommand, Debug)]
pub enum WebCommand {
  /// Search the web
  Search {
    /// Search terms
    #[arg(required = true, num_args = 1..)]
    query: Vec<String>,
  },

  /// Show a page's title, description and downloadable images
  Page {
    /// Page URL
    url: String,
  },

  /// Download a resource straight into memory
  Download {
    /// Resource URL
    url: String,

    /// Name in memory (defaults to the URL's file name)
    #[arg(long)]
    name: Option<String>,

    /// Accept any content type, not only images
    #[arg(long)]
    any: bool,

    /// Expected SHA256 of the content
    #[arg(long, value_name = "HEX")]
    sha256: Option<String>,

    /// Replace an existing entry
    #[arg(long)]
    force: bool,
  },

  /// Search, pick a result, then pick an image to download
  Browse {
    /// Search terms
    #[arg(required = true, num_args = 1..)]
    query: Vec<String>,
  },
}

/// Options for storing a download.
#[derive(Debug, Default)]
struct DownloadOptions<'a> {
  name: Option<&'a str>,
  any: bool,
  sha256: Option<&'a str>,
  force: bool,
}

pub fn cmd_web(command: WebCommand, session: &mut Session, fetcher: &dyn FetchService) -> Result<()> {
  let store = &mut session.store;

  match command {
    WebCommand::Search { query } => {
      let results = fetcher.search(&query.join(" "))?;
      if results.is_empty() {
        print_info("No results found");
        return Ok(());
      }
      for (i, result) in results.iter().enumerate() {
        print_item(i + 1, &format!("{} {} {}", result.title, symbols::ARROW, result.url));
      }
      Ok(())
    }
    WebCommand::Page { url } => {
      let page = fetcher.fetch_page(&url)?;
      print_page(&page);
      Ok(())
    }
    WebCommand::Download {
      url,
      name,
      any,
      sha256,
      force,
    } => {
      let options = DownloadOptions {
        name: name.as_deref(),
        any,
        sha256: sha256.as_deref(),
        force,
      };
      let name = download_into_memory(store, fetcher, &url, &options)?;
      print_success(&format!("Saved '{}' to memory", name));
      Ok(())
    }
    WebCommand::Browse { query } => browse(store, fetcher, &query.join(" "), &mut io::stdin().lock()),
  }
}

fn print_page(page: &PageDetails) {
  print_stat("Title", &page.title);
  print_stat("Description", &page.description);
  if page.resources.is_empty() {
    print_info("No downloadable images on this page");
    return;
  }
  println!();
  for (i, resource) in page.resources.iter().enumerate() {
    print_item(i + 1, resource);
  }
}

/// Fetch `url` and store the bytes under `options.name` or a name derived
/// from the URL. Returns the entry name.
fn download_into_memory(
  store: &mut ArchiveStore,
  fetcher: &dyn FetchService,
  url: &str,
  options: &DownloadOptions<'_>,
) -> Result<String> {
  let download = fetcher.download(url)?;

  if !options.any {
    ensure_image(&download)?;
  }
  if let Some(expected) = options.sha256 {
    verify_sha256(&download, expected)?;
  }

  let name = options
    .name
    .map(str::to_string)
    .unwrap_or_else(|| url_to_filename(&download.url));
  debug!(name = %name, size = download.bytes.len(), "storing download");

  if options.force {
    store.put(&name, &download.bytes)?;
  } else {
    store
      .add(&name, &download.bytes)
      .with_context(|| format!("Cannot save '{}' (use --force to replace it)", name))?;
  }
  Ok(name)
}

/// Read a 1-based choice from `input`. `None` when the user leaves it empty
/// or input ends.
fn pick<R: BufRead>(input: &mut R, message: &str, count: usize) -> Result<Option<usize>> {
  loop {
    let Some(answer) = ask(input, message)? else {
      return Ok(None);
    };
    let answer = answer.trim();
    if answer.is_empty() {
      return Ok(None);
    }
    match answer.parse::<usize>() {
      Ok(n) if (1..=count).contains(&n) => return Ok(Some(n - 1)),
      _ => print_warning(&format!("Enter a number between 1 and {}", count)),
    }
  }
}

fn browse<R: BufRead>(store: &mut ArchiveStore, fetcher: &dyn FetchService, query: &str, input: &mut R) -> Result<()> {
  let results = fetcher.search(query)?;
  if results.is_empty() {
    bail!("No results found for '{}'", query);
  }
  for (i, result) in results.iter().enumerate() {
    print_item(i + 1, &result.title);
  }

  let Some(choice) = pick(input, "Open result (empty to stop): ", results.len())? else {
    return Ok(());
  };
  let page = fetcher.fetch_page(&results[choice].url)?;
  print_page(&page);
  if page.resources.is_empty() {
    return Ok(());
  }

  let Some(choice) = pick(input, "Download image (empty to stop): ", page.resources.len())? else {
    return Ok(());
  };
  let name = download_into_memory(store, fetcher, &page.resources[choice], &DownloadOptions::default())?;
  print_success(&format!("Saved '{}' to memory", name));
  Ok(())
}
