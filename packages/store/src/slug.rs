//! Title to slug conversion with Cyrillic transliteration.
//!
//! Titles are lowercased, `&` becomes `and`, every run of whitespace and
//! hyphens collapses to a single `-`, Russian letters are spelled out in Latin
//! and whatever is left that is not a word character or a hyphen is dropped.
//!
//! ```
//! assert_eq!(store::slugify("New Title"), "new-title");
//! assert_eq!(store::slugify("Щука & ёж"), "schuka-and-yozh");
//! ```

/// Convert a title into a URL-safe slug.
///
/// The result only contains `[a-z0-9_-]`. It may be empty when the title
/// has nothing that survives transliteration.
pub fn slugify(title: &str) -> String {
    let lower = title
        .to_lowercase()
        .replace("&amp;", " and ")
        .replace('&', " and ");

    let mut slug = String::with_capacity(lower.len());
    let mut in_gap = false;
    for c in lower.chars() {
        if c == '-' || c.is_whitespace() {
            if !in_gap {
                slug.push('-');
                in_gap = true;
            }
            continue;
        }
        in_gap = false;
        push_transliterated(c, &mut slug);
    }
    slug
}

/// Append the Latin spelling of `c`, or nothing if it has none.
fn push_transliterated(c: char, out: &mut String) {
    let latin = match c {
        'a'..='z' | '0'..='9' | '_' => {
            out.push(c);
            return;
        }
        // Dashes survive as hyphens, all other punctuation is dropped
        '–' | '—' | '‒' | '−' => "-",
        'щ' => "sch",
        'ё' => "yo",
        'ж' => "zh",
        'ц' => "ts",
        'ч' => "ch",
        'ш' => "sh",
        'ы' => "yi",
        'ю' => "yu",
        'я' => "ya",
        'а' => "a",
        'б' => "b",
        'в' => "v",
        'г' => "g",
        'д' => "d",
        'е' => "e",
        'з' => "z",
        'и' => "i",
        'й' => "j",
        'к' => "k",
        'л' => "l",
        'м' => "m",
        'н' => "n",
        'о' => "o",
        'п' => "p",
        'р' => "r",
        'с' => "s",
        'т' => "t",
        'у' => "u",
        'ф' => "f",
        'х' => "h",
        'э' => "e",
        'є' => "ye",
        'і' => "i",
        'ї' => "yi",
        'ґ' => "g",
        _ => return,
    };
    out.push_str(latin);
}
