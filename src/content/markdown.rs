//! Markdown rendering with syntax highlighting

use std::borrow::Cow;

use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};
use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::{start_highlighted_html_snippet, styled_line_to_highlighted_html, IncludeBackground};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

use crate::config::HighlightConfig;
use crate::error::{ContentError, Result};

const DEFAULT_THEME: &str = "base16-ocean.dark";

/// Markdown renderer with optional syntax highlighting
///
/// Both variants parse with smart punctuation and let raw HTML through
/// untouched. Only [`MarkdownRenderer::render`] highlights code blocks.
pub struct MarkdownRenderer {
    highlighter: Option<Highlighter>,
}

/// Code block highlighter backed by syntect
struct Highlighter {
    syntax_set: SyntaxSet,
    theme: Theme,
    line_numbers: bool,
}

/// A fenced or indented code block being collected
struct CodeBlock {
    lang: Option<String>,
    source: String,
}

impl MarkdownRenderer {
    /// Create a new markdown renderer
    pub fn new() -> Self {
        Self::with_options(DEFAULT_THEME, false)
    }

    /// Create with custom settings
    pub fn with_options(theme: &str, line_numbers: bool) -> Self {
        Self {
            highlighter: Some(Highlighter::new(theme, line_numbers)),
        }
    }

    /// Create a renderer that never highlights
    pub fn without_highlighting() -> Self {
        Self { highlighter: None }
    }

    /// Create from the `highlight` section of the site config
    pub fn from_config(config: &HighlightConfig) -> Self {
        if config.enable {
            Self::with_options(&config.theme, config.line_number)
        } else {
            Self::without_highlighting()
        }
    }

    fn options() -> Options {
        // No YAML metadata blocks: front-matter is split off before rendering
        Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_SMART_PUNCTUATION
            | Options::ENABLE_HEADING_ATTRIBUTES
            | Options::ENABLE_GFM
    }

    /// Render markdown to HTML, highlighting fenced code blocks
    ///
    /// A highlighter failure fails the whole document.
    pub fn render(&self, markdown: &str) -> Result<String> {
        let Some(highlighter) = &self.highlighter else {
            return Ok(self.render_plain(markdown));
        };

        let markdown = replace_control_chars(markdown);
        let parser = Parser::new_ext(&markdown, Self::options());

        let mut events: Vec<Event> = Vec::new();
        let mut code_block: Option<CodeBlock> = None;

        for event in parser {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    code_block = Some(CodeBlock {
                        lang: fence_language(&kind),
                        source: String::new(),
                    });
                }
                Event::End(TagEnd::CodeBlock) => {
                    if let Some(block) = code_block.take() {
                        let highlighted =
                            highlighter.highlight(&block.source, block.lang.as_deref())?;
                        events.push(Event::Html(CowStr::from(highlighted)));
                    }
                }
                Event::Text(text) if code_block.is_some() => {
                    if let Some(block) = code_block.as_mut() {
                        block.source.push_str(&text);
                    }
                }
                event => events.push(event),
            }
        }

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());

        Ok(html_output)
    }

    /// Render markdown to HTML without the highlighting stage
    pub fn render_plain(&self, markdown: &str) -> String {
        let markdown = replace_control_chars(markdown);
        let parser = Parser::new_ext(&markdown, Self::options());
        let mut html_output = String::new();
        html::push_html(&mut html_output, parser);
        html_output
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Highlighter {
    fn new(theme_name: &str, line_numbers: bool) -> Self {
        let mut theme_set = ThemeSet::load_defaults();
        let theme = match theme_set.themes.remove(theme_name) {
            Some(theme) => theme,
            None => {
                tracing::warn!(
                    "Unknown highlight theme {:?}, falling back to {}",
                    theme_name,
                    DEFAULT_THEME
                );
                theme_set
                    .themes
                    .remove(DEFAULT_THEME)
                    .unwrap_or_default()
            }
        };

        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme,
            line_numbers,
        }
    }

    /// Highlight a code block
    fn highlight(&self, code: &str, lang: Option<&str>) -> Result<String> {
        let lang = lang.unwrap_or("text");

        // Try to find syntax for the language
        let syntax = self
            .syntax_set
            .find_syntax_by_token(lang)
            .or_else(|| self.syntax_set.find_syntax_by_extension(lang))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let mut highlighter = HighlightLines::new(syntax, &self.theme);
        let mut lines = Vec::new();
        for line in LinesWithEndings::from(code) {
            let regions = highlighter
                .highlight_line(line, &self.syntax_set)
                .map_err(|e| ContentError::Render(format!("highlighting {lang}: {e}")))?;
            let html = styled_line_to_highlighted_html(&regions[..], IncludeBackground::No)
                .map_err(|e| ContentError::Render(format!("highlighting {lang}: {e}")))?;
            lines.push(html);
        }

        let (pre_open, _) = start_highlighted_html_snippet(&self.theme);
        let code_html = lines.concat();

        if self.line_numbers {
            let gutter = (1..=lines.len())
                .map(|n| format!(r#"<span class="line-number">{}</span>"#, n))
                .collect::<Vec<_>>()
                .join("\n");
            Ok(format!(
                r#"<figure class="highlight {lang}"><table><tr><td class="gutter"><pre>{gutter}</pre></td><td class="code">{pre_open}<code>{code_html}</code></pre></td></tr></table></figure>"#
            ))
        } else {
            Ok(format!(
                r#"<figure class="highlight {lang}">{pre_open}<code>{code_html}</code></pre></figure>"#
            ))
        }
    }
}

/// Normalize line endings and replace control characters with U+FFFD
///
/// Tabs and newlines are the only control characters left in the source.
fn replace_control_chars(markdown: &str) -> Cow<'_, str> {
    if !markdown
        .chars()
        .any(|c| c.is_control() && c != '\n' && c != '\t')
    {
        return Cow::Borrowed(markdown);
    }

    let mut out = String::with_capacity(markdown.len());
    let mut chars = markdown.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\r' => {
                if chars.peek() != Some(&'\n') {
                    out.push('\n');
                }
            }
            '\n' | '\t' => out.push(c),
            c if c.is_control() => out.push(char::REPLACEMENT_CHARACTER),
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Language token of a fenced block, reduced to characters safe in a class name
fn fence_language(kind: &CodeBlockKind) -> Option<String> {
    let CodeBlockKind::Fenced(info) = kind else {
        return None;
    };
    let token = info
        .split(|c: char| c.is_whitespace() || c == ',' || c == '{')
        .next()
        .unwrap_or("");
    let token: String = token
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '+' | '#' | '.'))
        .collect();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}
