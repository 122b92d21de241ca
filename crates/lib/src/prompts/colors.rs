//! # Allowed Color Vocabulary
//!
//! The closed list of color names the model is instructed to use for
//! `main_color`. The list is rendered into the system prompt and reused for the
//! local advisory check in `response::unknown_colors`.

/// Color names accepted in `main_color`, in the order they appear in the prompt.
pub const ALLOWED_COLORS: &[&str] = &[
    "green", "blue", "purple", "red", "pink", "yellow", "orange", "brown",
    "teal", "lightblue", "grey", "limegreen", "magenta", "lightgreen", "brightgreen", "skyblue",
    "cyan", "turquoise", "darkblue", "darkgreen", "aqua", "olive", "navyblue", "lavender",
    "fuchsia", "black", "royalblue", "violet", "hotpink", "tan", "forestgreen", "lightpurple",
    "neongreen", "yellowgreen", "maroon", "darkpurple", "salmon", "peach", "beige", "lime",
    "seafoamgreen", "mustard", "brightblue", "lilac", "seagreen", "palegreen", "bluegreen", "mint",
    "lightbrown", "mauve", "darkred", "greyblue", "burntorange", "darkpink", "indigo", "periwinkle",
    "bluegrey", "lightpink", "aquamarine", "gold", "brightpurple", "grassgreen", "redorange", "bluepurple",
    "greygreen", "kellygreen", "puke", "rose", "darkteal", "babyblue", "paleblue", "greenyellow",
    "brickred", "lightgrey", "darkgrey", "white", "brightpink", "chartreuse", "purpleblue", "royalpurple",
    "burgundy", "goldenrod", "darkbrown", "lightorange", "darkorange", "redbrown", "paleyellow", "plum",
    "offwhite", "pinkpurple", "darkyellow", "lightyellow", "mustardyellow", "brightred", "peagreen", "khaki",
    "orangered", "crimson", "deepblue", "springgreen", "cream", "palepink", "yelloworange", "deeppurple",
    "pinkred", "pastelgreen", "sand", "rust", "lightred", "taupe", "armygreen", "robinseggblue",
    "huntergreen", "greenblue", "lightteal", "cerulean", "flesh", "orangebrown", "slateblue", "slate",
    "coral", "blueviolet", "ochre", "leafgreen", "electricblue", "seablue", "midnightblue", "steelblue",
    "brick", "palepurple", "mediumblue", "burntsienna", "darkmagenta", "eggplant", "sage", "darkturquoise",
    "puce", "bloodred", "neonpurple", "mossgreen", "terracotta", "oceanblue", "yellowbrown", "brightyellow",
    "dustyrose", "applegreen", "neonpink", "skin", "cornflowerblue", "lightturquoise", "wine", "deepred",
    "azure",
];

/// Returns `true` if `name` is one of the allowed color names.
///
/// Matching is exact; the model is told to use the names verbatim.
pub fn is_allowed_color(name: &str) -> bool {
    ALLOWED_COLORS.contains(&name)
}

/// Renders the vocabulary as the comma-separated line embedded in the prompt.
pub fn allowed_colors_line() -> String {
    ALLOWED_COLORS.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_vocabulary_has_no_duplicates() {
        let unique: HashSet<_> = ALLOWED_COLORS.iter().collect();
        assert_eq!(unique.len(), ALLOWED_COLORS.len());
    }

    #[test]
    fn test_is_allowed_color() {
        assert!(is_allowed_color("robinseggblue"));
        assert!(is_allowed_color("azure"));
        assert!(!is_allowed_color("Azure"));
        assert!(!is_allowed_color("Not found"));
    }
}
