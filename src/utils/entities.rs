use memchr::memchr;

/// Decode the HTML entities the index generator emits inside labels.
///
/// Handles the named entities (`&amp;` `&lt;` `&gt;` `&quot;` `&apos;`)
/// plus decimal and hex character references. Unrecognized sequences pass
/// through unchanged.
pub fn decode_entities(text: &str) -> String {
    if memchr(b'&', text.as_bytes()).is_none() {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];

        // Entities are short; look for the semicolon nearby only
        let semi = rest
            .char_indices()
            .take_while(|(i, _)| *i <= 10)
            .find(|(_, c)| *c == ';')
            .map(|(i, _)| i);

        match semi.and_then(|semi| decode_entity(&rest[1..semi]).map(|ch| (semi, ch))) {
            Some((semi, ch)) => {
                out.push(ch);
                rest = &rest[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

/// Encode label characters that must appear as entities in the index
pub fn encode_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

fn decode_entity(entity: &str) -> Option<char> {
    match entity {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => {
            let rest = entity.strip_prefix('#')?;
            let code = match rest.strip_prefix('x').or_else(|| rest.strip_prefix('X')) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => rest.parse().ok()?,
            };
            char::from_u32(code)
        }
    }
}
