/// Named character references understood in text and attribute strings
const NAMED_ENTITIES: &[(&str, char)] = &[
    ("amp", '&'),
    ("lt", '<'),
    ("gt", '>'),
    ("quot", '"'),
    ("apos", '\''),
    ("nbsp", '\u{a0}'),
    ("copy", '©'),
    ("reg", '®'),
    ("trade", '™'),
    ("hellip", '…'),
    ("mdash", '—'),
    ("ndash", '–'),
    ("lsquo", '‘'),
    ("rsquo", '’'),
    ("ldquo", '“'),
    ("rdquo", '”'),
    ("laquo", '«'),
    ("raquo", '»'),
    ("middot", '·'),
    ("bull", '•'),
    ("times", '×'),
    ("divide", '÷'),
    ("deg", '°'),
    ("euro", '€'),
];

/// Decode `&name;`, `&#N;` and `&#xH;` references. Anything that is not a
/// well-formed known reference is kept verbatim.
pub fn decode_entities(raw: &str) -> String {
    if !raw.contains('&') {
        return raw.to_string();
    }

    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let candidate = &rest[amp + 1..];

        match candidate.find(';').filter(|end| *end <= 10) {
            Some(end) => match decode_reference(&candidate[..end]) {
                Some(ch) => {
                    out.push(ch);
                    rest = &candidate[end + 1..];
                }
                None => {
                    out.push('&');
                    rest = candidate;
                }
            },
            None => {
                out.push('&');
                rest = candidate;
            }
        }
    }

    out.push_str(rest);
    out
}

fn decode_reference(reference: &str) -> Option<char> {
    if let Some(numeric) = reference.strip_prefix('#') {
        let code = match numeric.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => numeric.parse::<u32>().ok()?,
        };
        return char::from_u32(code);
    }

    NAMED_ENTITIES
        .iter()
        .find(|(name, _)| *name == reference)
        .map(|(_, ch)| *ch)
}
