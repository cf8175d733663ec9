//! Naming templates.
//!
//! Placeholders are `{field}` or `{field:0N}` (zero-padded numbers). Fields:
//! title, year, series, season, episode, extension, media. Missing fields render
//! empty and the leftovers (empty brackets, dangling separators) are tidied up.

use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use super::metadata::Metadata;

static EMPTY_BRACKETS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(\s*\)|\[\s*\]|\{\s*\}").expect("valid bracket pattern"));
static REPEATED_DASH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-(?:\s*-)+").expect("valid dash pattern"));
static SEPARATOR_BEFORE_EXT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s_-]+(\.[^.\s]+)$").expect("valid extension pattern"));

/// Characters that cannot appear inside a single path component.
const HOSTILE: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Style switches applied to rendered file names.
#[derive(Debug, Clone, Copy, Default)]
pub struct NameStyle {
    pub scene: bool,
    pub lowercase: bool,
}

/// Substitute placeholders in `template`. Errors name the offending placeholder.
pub fn render(template: &str, meta: &Metadata) -> Result<String, String> {
    let mut out = String::with_capacity(template.len() + 32);
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let close = after
            .find('}')
            .ok_or_else(|| format!("unclosed placeholder in template '{template}'"))?;
        out.push_str(&expand(&after[..close], meta)?);
        rest = &after[close + 1..];
    }
    out.push_str(rest);
    Ok(out)
}

fn expand(placeholder: &str, meta: &Metadata) -> Result<String, String> {
    let (name, width) = match placeholder.split_once(':') {
        Some((name, spec)) => {
            let width = spec
                .trim_start_matches('0')
                .parse::<usize>()
                .map_err(|_| format!("invalid format '{spec}' for field '{name}'"))?;
            (name.trim(), width)
        }
        None => (placeholder.trim(), 0),
    };
    let number = |n: Option<u32>| n.map(|n| format!("{n:0width$}")).unwrap_or_default();
    let text = |s: &Option<String>| s.as_deref().map(sanitize).unwrap_or_default();
    Ok(match name {
        "title" => text(&meta.title),
        "series" => text(&meta.series),
        "year" => number(meta.year.map(u32::from)),
        "season" => number(meta.season),
        "episode" => number(meta.episode),
        "extension" => meta.extension.clone(),
        "media" => meta.media.to_string(),
        other => return Err(format!("unknown template field '{other}'")),
    })
}

/// Strip characters that would create extra path components or are invalid on Windows.
/// A value made only of dots would name `.` or `..`, so it renders empty.
pub fn sanitize(value: &str) -> String {
    let clean: String = value
        .chars()
        .filter(|c| !HOSTILE.contains(c) && !c.is_control())
        .collect();
    let clean = clean.trim();
    if clean.chars().all(|c| c == '.' || c.is_whitespace()) {
        return String::new();
    }
    clean.to_string()
}

/// Tidy one rendered path component.
fn tidy(component: &str) -> String {
    let s = EMPTY_BRACKETS.replace_all(component, "");
    let s = REPEATED_DASH.replace_all(&s, "-");
    let s = s.split_whitespace().collect::<Vec<_>>().join(" ");
    let s = SEPARATOR_BEFORE_EXT.replace(&s, "$1");
    s.trim_matches(|c: char| c == '-' || c == '_' || c.is_whitespace())
        .to_string()
}

fn apply_style(name: &str, style: NameStyle) -> String {
    if style.scene {
        let dotted: String = name
            .chars()
            .filter(|c| !matches!(c, '(' | ')' | '[' | ']' | ',' | '\'' | '!'))
            .map(|c| if c.is_whitespace() { '.' } else { c })
            .collect();
        let mut out = String::with_capacity(dotted.len());
        for c in dotted.chars() {
            // collapse ".-." and ".." runs left by removed punctuation
            if (c == '.' || c == '-') && out.ends_with(['.', '-']) {
                out.pop();
                out.push('.');
                continue;
            }
            out.push(c);
        }
        out.to_lowercase()
    } else if style.lowercase {
        name.to_lowercase()
    } else {
        name.to_string()
    }
}

/// Render the final file name for `meta`.
pub fn render_file_name(template: &str, meta: &Metadata, style: NameStyle) -> Result<String, String> {
    let name = tidy(&render(template, meta)?);
    let name = apply_style(&name, style);
    if name.is_empty() || name == meta.extension || name.chars().all(|c| c == '.') {
        return Err(format!("template '{template}' rendered an empty file name"));
    }
    Ok(name)
}

/// Render the destination directory. Relative results are anchored at `base`.
pub fn render_directory(template: &str, meta: &Metadata, base: &Path) -> Result<PathBuf, String> {
    let rendered = render(template, meta)?;
    if rendered.trim().is_empty() {
        return Ok(base.to_path_buf());
    }
    let mut dir = PathBuf::new();
    for (i, part) in rendered.split(['/', '\\']).enumerate() {
        if i == 0 && part.is_empty() {
            dir.push(std::path::MAIN_SEPARATOR_STR);
            continue;
        }
        if i == 0 && part.ends_with(':') {
            dir.push(format!("{part}{}", std::path::MAIN_SEPARATOR));
            continue;
        }
        let part = tidy(part);
        if !part.is_empty() {
            dir.push(part);
        }
    }
    Ok(if dir.is_absolute() || has_prefix(&dir) {
        dir
    } else {
        base.join(dir)
    })
}

// "C:" style prefixes are not absolute on their own on Windows but still anchor the path.
fn has_prefix(p: &Path) -> bool {
    matches!(p.components().next(), Some(std::path::Component::Prefix(_)))
}
