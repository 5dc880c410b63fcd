use std::error::Error;

use anagram_form::form::{
    DUPLICATES_HEADING, MATCHES_HEADING, NO_DUPLICATES_MESSAGE, NO_MATCHES_MESSAGE,
};
use anagram_form::{
    DuplicateCount, FormController, Panel, alphagram, count_duplicates, find_anagrams,
    is_anagram, parse_candidates,
};
use atty::Stream;
use clap::{Parser, Subcommand};
use serde_json::json;
use termimad::{FmtText, MadSkin, terminal_size};

#[derive(Parser, Debug)]
#[command(
    name = "anagram-form",
    about = "Find anagrams and duplicate words in comma-separated lists",
    version
)]
pub struct Cli {
    /// Emit JSON instead of human-readable tables.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check whether two words are anagrams of each other.
    Check {
        first: String,
        second: String,
    },
    /// List the entries of a comma-separated list that are anagrams of a word.
    Find {
        /// Word to rearrange.
        word: String,
        /// Comma-separated candidate list.
        list: String,
    },
    /// List the entries that occur more than once in a comma-separated list.
    Dupes {
        /// Comma-separated candidate list.
        list: String,
    },
    /// Run both checks the way the web form does.
    Analyze {
        /// Word to rearrange.
        word: String,
        /// Comma-separated candidate list.
        list: String,
    },
    /// Serve the form over HTTP.
    #[cfg(feature = "web")]
    Serve {
        /// Address to bind.
        #[arg(long, default_value = "127.0.0.1:8080")]
        addr: std::net::SocketAddr,
        /// Page styling: `tailwind` or `bootstrap`.
        #[arg(long, default_value = "tailwind")]
        theme: String,
        /// Public base URL used for canonical links. Defaults to `http://<addr>`.
        #[arg(long)]
        base_url: Option<String>,
        /// Maximum number of browser sessions kept in memory.
        #[arg(long, default_value_t = anagram_form::session::DEFAULT_SESSION_CAPACITY)]
        sessions: usize,
    },
}

pub fn run() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    match cli.command {
        Command::Check { first, second } => handle_check(&first, &second, cli.json),
        Command::Find { word, list } => handle_find(&word, &list, cli.json),
        Command::Dupes { list } => handle_dupes(&list, cli.json),
        Command::Analyze { word, list } => handle_analyze(&word, &list, cli.json),
        #[cfg(feature = "web")]
        Command::Serve {
            addr,
            theme,
            base_url,
            sessions,
        } => handle_serve(addr, &theme, base_url, sessions),
    }
}

fn handle_check(first: &str, second: &str, as_json: bool) -> Result<(), Box<dyn Error>> {
    let anagram = is_anagram(first, second);
    let rows = [
        (first, alphagram(first)),
        (second, alphagram(second)),
    ];

    if as_json {
        let payload = json!({
            "first": first,
            "second": second,
            "is_anagram": anagram,
            "alphagrams": rows.iter().map(|(_, sorted)| sorted).collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        let width = rows
            .iter()
            .map(|(word, _)| word.chars().count())
            .max()
            .unwrap_or(0)
            .max("WORD".len());
        println!("{:<width$}  {}", "WORD", "ALPHAGRAM", width = width);
        println!("{:-<width$}  {}", "", "---------", width = width);
        for (word, sorted) in &rows {
            println!("{:<width$}  {}", word, sorted, width = width);
        }
        let verdict = if anagram { "are" } else { "are not" };
        println!("\n\"{first}\" and \"{second}\" {verdict} anagrams.");
    }
    Ok(())
}

fn handle_find(word: &str, list: &str, as_json: bool) -> Result<(), Box<dyn Error>> {
    let candidates = parse_candidates(list);
    let matches = find_anagrams(word, &candidates);

    if as_json {
        let payload = json!({
            "word": word,
            "candidates": candidates,
            "matches": matches,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        print_match_table(word, &matches);
    }
    Ok(())
}

fn handle_dupes(list: &str, as_json: bool) -> Result<(), Box<dyn Error>> {
    let candidates = parse_candidates(list);
    let duplicates = count_duplicates(&candidates);

    if as_json {
        let payload = json!({
            "candidates": candidates,
            "has_duplicates": !duplicates.is_empty(),
            "duplicates": duplicates,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        print_duplicate_table(&duplicates);
    }
    Ok(())
}

fn handle_analyze(word: &str, list: &str, as_json: bool) -> Result<(), Box<dyn Error>> {
    let mut form = FormController::new();
    form.set_word(word);
    form.set_word_list(list);
    form.submit();

    if as_json {
        let payload = json!({
            "state": form.state(),
            "snapshot": form.snapshot(),
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    let view = form.view();
    let Some(panels) = view.results else {
        return Ok(());
    };
    let mut body = String::new();
    push_panel(&mut body, &panels.matches, MATCHES_HEADING, NO_MATCHES_MESSAGE);
    body.push('\n');
    push_panel(
        &mut body,
        &panels.duplicates,
        DUPLICATES_HEADING,
        NO_DUPLICATES_MESSAGE,
    );
    render_markdown_block(&body);
    Ok(())
}

#[cfg(feature = "web")]
fn handle_serve(
    addr: std::net::SocketAddr,
    theme: &str,
    base_url: Option<String>,
    sessions: usize,
) -> Result<(), Box<dyn Error>> {
    use anagram_form::web::{self, WebConfig, WebTheme};

    web::init_tracing();
    let config = WebConfig {
        addr,
        theme: theme.parse::<WebTheme>()?,
        base_url: base_url.unwrap_or_else(|| format!("http://{addr}")),
        session_capacity: sessions,
    };
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(web::serve(config))?;
    Ok(())
}

fn push_panel(body: &mut String, panel: &Panel<'_>, heading: &str, empty_message: &str) {
    match panel {
        Panel::Empty => {
            body.push_str(empty_message);
            body.push('\n');
        }
        Panel::Items(items) => {
            body.push_str(&format!("**{heading}**\n\n"));
            for item in items.iter() {
                body.push_str(&format!("* {item}\n"));
            }
        }
    }
}

fn print_match_table(word: &str, matches: &[&str]) {
    if matches.is_empty() {
        println!("No anagrams of \"{word}\" found.");
        return;
    }
    let width = matches
        .iter()
        .map(|candidate| candidate.chars().count())
        .max()
        .unwrap_or(0)
        .max("MATCH".len());
    println!("Anagrams of \"{word}\":");
    println!("{:<4}  {}", "#", "MATCH");
    println!("{:-<4}  {:-<width$}", "", "", width = width);
    for (idx, candidate) in matches.iter().enumerate() {
        println!("{:<4}  {}", idx + 1, candidate);
    }
}

fn print_duplicate_table(rows: &[DuplicateCount]) {
    if rows.is_empty() {
        println!("{NO_DUPLICATES_MESSAGE}");
        return;
    }
    let width = rows
        .iter()
        .map(|row| row.value.chars().count())
        .max()
        .unwrap_or(0)
        .max("WORD".len());
    println!("{:<width$}  {}", "WORD", "COUNT", width = width);
    println!("{:-<width$}  {}", "", "-----", width = width);
    for row in rows {
        println!("{:<width$}  {}", row.value, row.occurrences, width = width);
    }
}

fn stdout_is_tty() -> bool {
    atty::is(Stream::Stdout)
}

fn markdown_width() -> usize {
    let (width, _) = terminal_size();
    width.max(60) as usize
}

fn render_markdown_block(body: &str) {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return;
    }
    if stdout_is_tty() {
        let skin = MadSkin::default();
        let formatted = FmtText::from(&skin, trimmed, Some(markdown_width()));
        println!("{formatted}");
    } else {
        println!("{trimmed}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_find() {
        let cli = Cli::try_parse_from(["anagram-form", "--json", "find", "listen", "silent, x"])
            .expect("valid arguments");
        assert!(cli.json);
        match cli.command {
            Command::Find { word, list } => {
                assert_eq!(word, "listen");
                assert_eq!(list, "silent, x");
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn analyze_markdown_uses_form_labels() {
        let mut form = FormController::new();
        form.set_word("listen");
        form.set_word_list("silent, hello, enlist");
        form.submit();
        let panels = form.view().results.expect("panels after submit");
        let mut body = String::new();
        push_panel(&mut body, &panels.matches, MATCHES_HEADING, NO_MATCHES_MESSAGE);
        push_panel(
            &mut body,
            &panels.duplicates,
            DUPLICATES_HEADING,
            NO_DUPLICATES_MESSAGE,
        );
        assert_eq!(
            body,
            "**Anagrams found:**\n\n* silent\n* enlist\nNo duplicate words in the list.\n"
        );
    }
}
