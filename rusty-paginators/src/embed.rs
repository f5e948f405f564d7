use twilight_model::channel::message::embed::Embed;
use twilight_util::builder::embed::{EmbedBuilder, EmbedFooterBuilder};

/// Default embed color used across paginator UI.
pub const DEFAULT_EMBED_COLOR: u32 = 0x90_54_30;

/// Separator between a caller's footer text and the page marker.
const FOOTER_SEPARATOR: char = '|';

/// Build a standard embed with consistent styling.
pub fn build_titled_embed(title: &str, description: impl Into<String>) -> anyhow::Result<Embed> {
    let embed = EmbedBuilder::new()
        .title(title)
        .color(DEFAULT_EMBED_COLOR)
        .description(description)
        .validate()?
        .build();

    Ok(embed)
}

/// Build an embed carrying only an optional title and description.
///
/// Used when a paginator is decorated with a title but the page has no embed of its own.
pub fn decoration_embed(title: Option<&str>, description: Option<&str>) -> Embed {
    let mut builder = EmbedBuilder::new().color(DEFAULT_EMBED_COLOR);
    if let Some(title) = title {
        builder = builder.title(title);
    }
    if let Some(description) = description {
        builder = builder.description(description);
    }

    builder.build()
}

/// Write the page marker into an embed footer.
///
/// Existing footer text keeps everything before the first `|`, so the marker
/// is replaced rather than stacked on every render.
pub fn apply_page_footer(embed: &mut Embed, page_string: &str) {
    let footer_text = match embed.footer.as_ref().map(|footer| footer.text.as_str()) {
        Some(text) if !text.trim().is_empty() => {
            let base = text
                .split(FOOTER_SEPARATOR)
                .next()
                .unwrap_or_default()
                .trim();
            if base.is_empty() {
                page_string.to_owned()
            } else {
                format!("{base} {FOOTER_SEPARATOR} {page_string}")
            }
        }
        _ => page_string.to_owned(),
    };

    match embed.footer.as_mut() {
        Some(footer) => footer.text = footer_text,
        None => embed.footer = Some(EmbedFooterBuilder::new(footer_text).build()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn footer_is_created_when_missing() {
        let mut embed = decoration_embed(Some("Title"), None);
        apply_page_footer(&mut embed, "Page 1 of 3");

        assert_eq!(embed.footer.unwrap().text, "Page 1 of 3");
    }

    #[test]
    fn footer_keeps_caller_text_and_replaces_marker() {
        let mut embed = EmbedBuilder::new()
            .footer(EmbedFooterBuilder::new("Requested by Ferris").build())
            .build();

        apply_page_footer(&mut embed, "Page 1 of 3");
        apply_page_footer(&mut embed, "Page 2 of 3");

        assert_eq!(
            embed.footer.unwrap().text,
            "Requested by Ferris | Page 2 of 3"
        );
    }

    #[test]
    fn decoration_embed_sets_only_given_fields() {
        let embed = decoration_embed(None, Some("body"));

        assert_eq!(embed.title, None);
        assert_eq!(embed.description.as_deref(), Some("body"));
        assert_eq!(embed.color, Some(DEFAULT_EMBED_COLOR));
    }
}
