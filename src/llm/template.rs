/// Substitute `{name}` placeholders in a single pass. Substituted values are
/// never rescanned, so a value containing `{other}` is inserted verbatim.
/// Braces that do not form a known placeholder are left as they are.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(pos) = rest.find('{') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];

        let hit = vars.iter().find(|(name, _)| {
            tail[1..]
                .strip_prefix(name)
                .is_some_and(|after| after.starts_with('}'))
        });

        match hit {
            Some((name, value)) => {
                out.push_str(value);
                rest = &tail[name.len() + 2..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    out
}
