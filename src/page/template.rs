// Page template and placeholder substitution

use std::collections::BTreeMap;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderError {
    #[error("template references unknown value '{0}'")]
    UnknownPlaceholder(String),

    #[error("unterminated placeholder at byte {0}")]
    Unterminated(usize),
}

/// HTML template for the archive page
pub const PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title><%= title %></title>
<%= meta_tags %>
    <style>
        body {
            font-family: Arial, sans-serif;
            line-height: 1.6;
            max-width: 800px;
            margin: 0 auto;
            padding: 20px;
            color: #333;
        }
        .video-container {
            width: 100%;
            margin: 20px 0;
        }
        video {
            width: 100%;
            max-height: 600px;
            background-color: #000;
        }
        .metadata {
            background-color: #f9f9f9;
            padding: 15px;
            border-radius: 5px;
            margin: 20px 0;
        }
        .source {
            margin-top: 20px;
            font-style: italic;
        }
        a {
            color: #0066cc;
            text-decoration: none;
        }
        a:hover {
            text-decoration: underline;
        }
        .archive-note {
            border-top: 1px solid #ddd;
            margin-top: 30px;
            padding-top: 15px;
            font-size: 0.9em;
            color: #666;
        }
    </style>
</head>
<body>
    <h1><%= title %></h1>

    <div class="video-container">
        <video controls preload="metadata"<%= poster %>>
            <source src="<%= video_src %>" type="<%= video_mimetype %>">
            Your browser does not support the video tag.
        </video>
    </div>

    <div class="metadata">
        <p><strong>Creator:</strong> <%= uploader %></p>
        <p><strong>Published:</strong> <%= upload_date %></p>
<%= duration %><%= description %>    </div>

    <div class="source">
        <p>Original source: <a href="<%= webpage_url %>" target="_blank" rel="noopener"><%= webpage_url %></a></p>
    </div>

    <div class="archive-note">
        <p>This is an archived copy of the original content, saved on <%= archive_date %>.</p>
    </div>
</body>
</html>
"#;

/// Replace every `<%= name %>` with its value in one pass.
///
/// Values are inserted verbatim and never rescanned, so a value that
/// itself contains `<%=` stays literal text.
pub fn render_template(template: &str, values: &BTreeMap<&str, String>) -> Result<String, RenderError> {
    let mut out = String::with_capacity(template.len() + values.values().map(String::len).sum::<usize>());
    let mut rest = template;
    let mut offset = 0;

    while let Some(start) = rest.find("<%=") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 3..];
        let end = after
            .find("%>")
            .ok_or(RenderError::Unterminated(offset + start))?;
        let key = after[..end].trim();
        let value = values
            .get(key)
            .ok_or_else(|| RenderError::UnknownPlaceholder(key.to_string()))?;
        out.push_str(value);

        let consumed = start + 3 + end + 2;
        rest = &rest[consumed..];
        offset += consumed;
    }
    out.push_str(rest);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(pairs: &[(&'static str, &str)]) -> BTreeMap<&'static str, String> {
        pairs.iter().map(|(k, v)| (*k, v.to_string())).collect()
    }

    #[test]
    fn substitutes_placeholders() {
        let out = render_template(
            "<h1><%= title %></h1><p><%=uploader%></p><%= title %>",
            &values(&[("title", "Hi"), ("uploader", "Me")]),
        )
        .unwrap();
        assert_eq!(out, "<h1>Hi</h1><p>Me</p>Hi");
    }

    #[test]
    fn values_are_not_rescanned() {
        let out = render_template(
            "<%= a %>|<%= b %>",
            &values(&[("a", "<%= b %>"), ("b", "x")]),
        )
        .unwrap();
        assert_eq!(out, "<%= b %>|x");
    }

    #[test]
    fn unknown_and_unterminated_placeholders() {
        assert_eq!(
            render_template("<%= nope %>", &values(&[])),
            Err(RenderError::UnknownPlaceholder("nope".into()))
        );
        assert_eq!(
            render_template("ok <%= title", &values(&[("title", "x")])),
            Err(RenderError::Unterminated(3))
        );
    }

    #[test]
    fn page_template_placeholders_are_known() {
        let keys = [
            "title",
            "meta_tags",
            "poster",
            "video_src",
            "video_mimetype",
            "uploader",
            "upload_date",
            "duration",
            "description",
            "webpage_url",
            "archive_date",
        ];
        let map: BTreeMap<&str, String> = keys.iter().map(|k| (*k, String::new())).collect();
        assert!(render_template(PAGE_TEMPLATE, &map).is_ok());
    }
}
