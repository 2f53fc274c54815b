use crate::domain::VersionDescriptor;
use crate::error::{Result, VersionError};
use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

fn project_version_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)(<project_version>)(.*?)(</project_version>)")
            .expect("project_version pattern is a valid regex")
    })
}

/// Replace the text of the first `<project_version>` element.
///
/// Fails when the document has no such element.
pub fn stamp_project_version_str(xml: &str, version: &str) -> Result<String> {
    let re = project_version_regex();
    let caps = re.captures(xml).ok_or_else(|| {
        VersionError::artifact("no <project_version> element found in manifest")
    })?;

    let (Some(whole), Some(open), Some(close)) = (caps.get(0), caps.get(1), caps.get(3)) else {
        return Err(VersionError::artifact("malformed <project_version> element"));
    };

    let mut stamped = String::with_capacity(xml.len() + version.len());
    stamped.push_str(&xml[..whole.start()]);
    stamped.push_str(open.as_str());
    stamped.push_str(&escape_xml(version));
    stamped.push_str(close.as_str());
    stamped.push_str(&xml[whole.end()..]);
    Ok(stamped)
}

/// Stamp `version` into a manifest file. Returns whether the file changed.
pub fn stamp_project_version(path: &Path, version: &str) -> Result<bool> {
    let xml = fs::read_to_string(path).map_err(|e| {
        VersionError::artifact(format!("cannot read manifest '{}': {}", path.display(), e))
    })?;
    let stamped = stamp_project_version_str(&xml, version)
        .map_err(|e| VersionError::artifact(format!("{}: {}", path.display(), e)))?;

    write_if_changed(path, &xml, &stamped)
}

/// Placeholders understood by [render_template_str].
pub fn template_values(descriptor: &VersionDescriptor) -> Vec<(&'static str, String)> {
    vec![
        ("PROJECT_VERSION", descriptor.full_version().to_string()),
        ("PROJECT_VERSION_BASE", descriptor.base_version().to_string()),
        (
            "PROJECT_VERSION_DEV",
            descriptor
                .dev_number()
                .map(|n| n.to_string())
                .unwrap_or_default(),
        ),
        (
            "PROJECT_VERSION_COMMITS",
            descriptor.commits_since_tag().to_string(),
        ),
        ("PROJECT_VERSION_HASH", descriptor.short_hash().to_string()),
        (
            "PROJECT_VERSION_DIRTY",
            if descriptor.dirty() { "1" } else { "0" }.to_string(),
        ),
        ("PROJECT_BRANCH", descriptor.branch().to_string()),
    ]
}

/// Substitute `${NAME}` placeholders. Unknown placeholders stay as they are.
pub fn render_template_str(template: &str, descriptor: &VersionDescriptor) -> String {
    let mut rendered = template.to_string();
    for (name, value) in template_values(descriptor) {
        let placeholder = format!("${{{}}}", name);
        rendered = rendered.replace(&placeholder, &value);
    }
    rendered
}

/// Render a template file into `output`, leaving the output untouched when
/// its content would not change. Returns whether it was written.
pub fn render_template(template: &Path, output: &Path, descriptor: &VersionDescriptor) -> Result<bool> {
    let source = fs::read_to_string(template).map_err(|e| {
        VersionError::artifact(format!("cannot read template '{}': {}", template.display(), e))
    })?;
    let rendered = render_template_str(&source, descriptor);

    match fs::read_to_string(output) {
        Ok(previous) => write_if_changed(output, &previous, &rendered),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            fs::write(output, &rendered)?;
            tracing::info!(output = %output.display(), "rendered version resource");
            Ok(true)
        }
        Err(e) => Err(e.into()),
    }
}

fn write_if_changed(path: &Path, old: &str, new: &str) -> Result<bool> {
    if old == new {
        tracing::debug!(path = %path.display(), "content unchanged, not rewriting");
        return Ok(false);
    }
    fs::write(path, new)?;
    tracing::info!(path = %path.display(), "updated");
    Ok(true)
}

fn escape_xml(text: &str) -> String {
    // Versions never need more than these
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
