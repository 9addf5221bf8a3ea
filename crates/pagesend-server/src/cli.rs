//! `pagesend preview` / `pagesend open`: run the pipeline from the command
//! line against the settings in the data directory.

use std::sync::Arc;

use async_trait::async_trait;
use pagesend_core::{Error, Result, SettingsFile};
use pagesend_payload::{ActionKind, PageSnapshot, TabInfo};
use pagesend_trigger::{
    Collaborators, FixedSnapshot, Notification, Notifier, QuestionPrompt, Trigger,
    TriggerHandler, TriggerSource, WindowOpener,
};
use tokio::io::{AsyncBufReadExt, BufReader};

pub const USAGE: &str = "\
Trigger flags:
  --action <summary|translate|rewrite|followup>   (default: summary)
  --url <url>              Page URL
  --title <title>          Page title
  --selection <text>       Selected text
  --page-length <n>        Length of the page body text
  --language <code>        Translation target (e.g. fr, zh-CN)
  --ui-locale <code>       Fallback translation target
  --question <text>        Follow-up question (prompted on stdin if omitted)";

/// A trigger assembled from flags, with the snapshot the flags describe.
#[derive(Debug, Clone)]
pub struct TriggerArgs {
    pub trigger: Trigger,
    pub snapshot: Option<PageSnapshot>,
}

/// Parse trigger flags. A snapshot is only produced when page content
/// (`--selection` or `--page-length`) was given; otherwise the URL and title
/// act as tab metadata alone.
pub fn parse_trigger_args(args: &[String]) -> std::result::Result<TriggerArgs, String> {
    let mut action = None;
    let mut tab = TabInfo::default();
    let mut selection = None;
    let mut page_length = None;
    let mut language = None;
    let mut ui_locale = None;
    let mut question = None;

    let mut iter = args.iter();
    while let Some(flag) = iter.next() {
        let mut value = || {
            iter.next()
                .cloned()
                .ok_or_else(|| format!("Missing value for {}", flag))
        };
        match flag.as_str() {
            "--action" => {
                let name = value()?;
                action = Some(
                    ActionKind::from_name(&name)
                        .ok_or_else(|| format!("Unknown action: {}", name))?,
                );
            }
            "--url" => tab.url = value()?,
            "--title" => tab.title = value()?,
            "--selection" => selection = Some(value()?),
            "--page-length" => {
                let raw = value()?;
                page_length = Some(
                    raw.parse::<usize>()
                        .map_err(|_| format!("Invalid page length: {}", raw))?,
                );
            }
            "--language" => language = Some(value()?),
            "--ui-locale" => ui_locale = Some(value()?),
            "--question" => question = Some(value()?),
            other => return Err(format!("Unknown flag: {}", other)),
        }
    }

    let snapshot = (selection.is_some() || page_length.is_some()).then(|| PageSnapshot {
        selection_text: selection.unwrap_or_default(),
        page_text_length: page_length.unwrap_or(0),
        title: tab.title.clone(),
        url: tab.url.clone(),
        extraction_succeeded: true,
    });

    let mut trigger = Trigger::new(TriggerSource::Toolbar, tab);
    trigger.action = action;
    trigger.language = language;
    trigger.ui_locale = ui_locale;
    trigger.question = question;

    Ok(TriggerArgs { trigger, snapshot })
}

/// Build a handler over the settings file with CLI collaborators.
pub fn cli_handler(
    settings: Arc<SettingsFile>,
    snapshot: Option<PageSnapshot>,
    opener: Arc<dyn WindowOpener>,
) -> TriggerHandler {
    TriggerHandler::new(Collaborators {
        settings,
        snapshots: Arc::new(FixedSnapshot(snapshot)),
        opener,
        notifier: Arc::new(StderrNotifier),
        prompt: Arc::new(StdinPrompt),
    })
}

/// Prints notifications to stderr.
pub struct StderrNotifier;

#[async_trait]
impl Notifier for StderrNotifier {
    async fn notify(&self, notification: &Notification) -> Result<()> {
        eprintln!("{}: {}", notification.title, notification.message);
        Ok(())
    }
}

/// Reads the follow-up question from one line of stdin.
pub struct StdinPrompt;

#[async_trait]
impl QuestionPrompt for StdinPrompt {
    async fn ask(&self, tab: &TabInfo) -> Result<Option<String>> {
        if tab.title.is_empty() {
            eprint!("Question: ");
        } else {
            eprint!("Question about \"{}\": ", tab.title);
        }
        let mut line = String::new();
        let read = BufReader::new(tokio::io::stdin())
            .read_line(&mut line)
            .await
            .map_err(|e| Error::Prompt(e.to_string()))?;
        Ok((read > 0).then_some(line))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_tab_only() {
        let parsed = parse_trigger_args(&args(&["--url", "https://x.test/a", "--title", "Doc"])).unwrap();
        assert!(parsed.snapshot.is_none());
        assert_eq!(parsed.trigger.tab.url, "https://x.test/a");
        assert_eq!(parsed.trigger.action(), ActionKind::Summary);
    }

    #[test]
    fn test_parse_with_content() {
        let parsed = parse_trigger_args(&args(&[
            "--action",
            "translate",
            "--url",
            "https://x.test/a",
            "--selection",
            "Bonjour",
            "--language",
            "de",
        ]))
        .unwrap();
        let snapshot = parsed.snapshot.unwrap();
        assert_eq!(snapshot.selection_text, "Bonjour");
        assert_eq!(snapshot.url, "https://x.test/a");
        assert_eq!(parsed.trigger.action(), ActionKind::Translate);
        assert_eq!(parsed.trigger.language.as_deref(), Some("de"));
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_trigger_args(&args(&["--action", "dance"])).is_err());
        assert!(parse_trigger_args(&args(&["--page-length", "lots"])).is_err());
        assert!(parse_trigger_args(&args(&["--url"])).is_err());
        assert!(parse_trigger_args(&args(&["--verbose"])).is_err());
    }
}
