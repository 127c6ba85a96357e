//! Renderer module
//!
//! Renders ResultSet to different output formats: jsonl, json, md, raw, plain.
//! Every format except json can also be written one item at a time, which is
//! how search results are streamed while the scan is still running.

use colored::Colorize;
use std::io::Write;

use crate::core::model::{Kind, ResultItem, ResultSet};
use crate::core::paths::split_file_name;
use crate::core::util::format_mtime;

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Jsonl,
    Json,
    Markdown,
    Raw,
    Plain,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "jsonl" => Ok(OutputFormat::Jsonl),
            "json" => Ok(OutputFormat::Json),
            "md" | "markdown" => Ok(OutputFormat::Markdown),
            "raw" => Ok(OutputFormat::Raw),
            "plain" => Ok(OutputFormat::Plain),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

/// Render configuration combining format and options
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderConfig {
    pub format: OutputFormat,
    pub pretty: bool,
}

impl RenderConfig {
    #[cfg(test)]
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            pretty: false,
        }
    }

    /// Create a new render config with pretty option
    pub fn with_pretty(format: OutputFormat, pretty: bool) -> Self {
        Self { format, pretty }
    }
}

/// Renderer for result sets
pub struct Renderer {
    config: RenderConfig,
}

impl Renderer {
    #[cfg(test)]
    pub fn new(format: OutputFormat) -> Self {
        Self {
            config: RenderConfig::new(format),
        }
    }

    /// Create a new renderer with render config
    pub fn with_config(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Whether items can be written as soon as they are found
    pub fn is_streaming(&self) -> bool {
        self.config.format != OutputFormat::Json
    }

    /// Render a complete result set to a string
    pub fn render(&self, result_set: &ResultSet) -> String {
        match self.config.format {
            OutputFormat::Json => self.render_json(result_set),
            OutputFormat::Markdown if !result_set.is_empty() => {
                let mut output = self.header().unwrap_or_default();
                for item in &result_set.items {
                    output.push_str(&self.render_item(item));
                }
                output
            }
            _ => result_set
                .items
                .iter()
                .map(|item| self.render_item(item))
                .collect(),
        }
    }

    /// Render to a writer
    pub fn render_to<W: Write>(
        &self,
        result_set: &ResultSet,
        mut writer: W,
    ) -> std::io::Result<()> {
        let output = self.render(result_set);
        writer.write_all(output.as_bytes())
    }

    /// Text that precedes the first streamed item, if the format has any
    pub fn header(&self) -> Option<String> {
        match self.config.format {
            OutputFormat::Markdown => Some("## Files\n\n".to_string()),
            _ => None,
        }
    }

    /// Render a single item, newline terminated
    ///
    /// Json has no per-item form; items are rendered as jsonl instead.
    pub fn render_item(&self, item: &ResultItem) -> String {
        let mut line = match self.config.format {
            OutputFormat::Jsonl | OutputFormat::Json => self.render_jsonl_item(item),
            OutputFormat::Markdown => render_markdown_item(item),
            OutputFormat::Raw => item.path.clone(),
            OutputFormat::Plain => render_plain_item(item),
        };
        line.push('\n');
        line
    }

    fn render_jsonl_item(&self, item: &ResultItem) -> String {
        let json = if self.config.pretty {
            serde_json::to_string_pretty(item)
        } else {
            serde_json::to_string(item)
        };
        json.unwrap_or_default()
    }

    /// Render as a single JSON array
    fn render_json(&self, result_set: &ResultSet) -> String {
        if self.config.pretty {
            serde_json::to_string_pretty(&result_set.items).unwrap_or_else(|_| "[]".to_string())
        } else {
            serde_json::to_string(&result_set.items).unwrap_or_else(|_| "[]".to_string())
        }
    }
}

fn render_markdown_item(item: &ResultItem) -> String {
    let mut output = match item.rank {
        Some(rank) => format!("{}. `{}`", rank, item.path),
        None => format!("- `{}`", item.path),
    };
    if item.kind == Kind::Removed {
        output.push_str(" (removed)");
    } else if let Some(size) = item.meta.size {
        output.push_str(&format!(" ({} bytes)", size));
    }
    output
}

/// Directory dimmed, file name in bold, mtime last
fn render_plain_item(item: &ResultItem) -> String {
    let (dir, name) = split_file_name(&item.path);
    let mut output = format!("{}{}", dir.dimmed(), name.bold());
    match item.kind {
        Kind::Removed => output.push_str(&format!("  {}", "removed".red())),
        Kind::File => {
            if let Some(mtime) = item.meta.mtime_ms.and_then(format_mtime) {
                output.push_str(&format!("  {}", mtime.dimmed()));
            }
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::Meta;
    use pretty_assertions::assert_eq;

    fn sample() -> ResultSet {
        let mut result_set = ResultSet::new();
        result_set.push(ResultItem::file("/home/me/notes.md", 1));
        result_set.push(ResultItem::file("/tmp/out.log", 2));
        result_set
    }

    #[test]
    fn test_render_jsonl() {
        let renderer = Renderer::new(OutputFormat::Jsonl);
        let output = renderer.render(&sample());

        assert_eq!(
            output,
            "{\"kind\":\"file\",\"path\":\"/home/me/notes.md\",\"rank\":1,\"meta\":{}}\n\
             {\"kind\":\"file\",\"path\":\"/tmp/out.log\",\"rank\":2,\"meta\":{}}\n"
        );
    }

    #[test]
    fn test_render_json() {
        let renderer = Renderer::new(OutputFormat::Json);
        let output = renderer.render(&sample());

        assert!(output.starts_with('['));
        assert!(output.ends_with(']'));
        let parsed: Vec<ResultItem> = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed, sample().items);
        assert!(!renderer.is_streaming());
    }

    #[test]
    fn test_render_json_pretty() {
        let config = RenderConfig::with_pretty(OutputFormat::Json, true);
        let renderer = Renderer::with_config(config);
        let output = renderer.render(&sample());
        assert!(output.contains("  "));
    }

    #[test]
    fn test_render_raw() {
        let renderer = Renderer::new(OutputFormat::Raw);
        assert_eq!(renderer.render(&sample()), "/home/me/notes.md\n/tmp/out.log\n");
        assert!(renderer.is_streaming());
    }

    #[test]
    fn test_render_markdown() {
        let mut result_set = sample();
        result_set.items[0].meta = Meta {
            mtime_ms: None,
            size: Some(1024),
        };
        result_set.push(ResultItem::removed("/gone.txt"));

        let renderer = Renderer::new(OutputFormat::Markdown);
        let output = renderer.render(&result_set);

        assert!(output.starts_with("## Files\n\n"));
        assert!(output.contains("1. `/home/me/notes.md` (1024 bytes)\n"));
        assert!(output.contains("2. `/tmp/out.log`\n"));
        assert!(output.contains("- `/gone.txt` (removed)\n"));
    }

    #[test]
    fn test_render_markdown_empty() {
        let renderer = Renderer::new(OutputFormat::Markdown);
        assert!(renderer.render(&ResultSet::new()).is_empty());
    }

    #[test]
    fn test_render_plain() {
        colored::control::set_override(false);
        let renderer = Renderer::new(OutputFormat::Plain);
        let item = ResultItem::file("/home/me/notes.md", 1).with_meta(Meta {
            mtime_ms: Some(0),
            size: None,
        });
        let output = renderer.render_item(&item);
        assert!(output.starts_with("/home/me/notes.md  "));
        assert!(output.ends_with('\n'));

        let removed = renderer.render_item(&ResultItem::removed("/gone"));
        assert_eq!(removed, "/gone  removed\n");
    }

    #[test]
    fn test_render_to_writer() {
        let renderer = Renderer::new(OutputFormat::Raw);
        let mut buffer = Vec::new();
        renderer.render_to(&sample(), &mut buffer).unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap().lines().count(), 2);
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!("jsonl".parse::<OutputFormat>().unwrap(), OutputFormat::Jsonl);
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("md".parse::<OutputFormat>().unwrap(), OutputFormat::Markdown);
        assert_eq!(
            "markdown".parse::<OutputFormat>().unwrap(),
            OutputFormat::Markdown
        );
        assert_eq!("raw".parse::<OutputFormat>().unwrap(), OutputFormat::Raw);
        assert_eq!("Plain".parse::<OutputFormat>().unwrap(), OutputFormat::Plain);
    }

    #[test]
    fn test_output_format_parse_invalid() {
        let result = "invalid".parse::<OutputFormat>();
        assert!(result.unwrap_err().contains("Unknown format"));
    }

    #[test]
    fn test_render_config_default() {
        let config = RenderConfig::default();
        assert_eq!(config.format, OutputFormat::Jsonl);
        assert!(!config.pretty);
    }
}
