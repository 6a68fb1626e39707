//! Turning processed CSS into a JavaScript module.

/// Escape `css` for embedding in a template literal.
pub fn escape_template(css: &str) -> String {
    css.replace('\\', "\\\\")
        .replace('`', "\\`")
        .replace("${", "\\${")
}

/// `export default `<css>`;`
pub fn default_module(css: &str) -> String {
    format!("export default `{}`;\n", escape_template(css))
}

/// A module that injects the stylesheet into `document.head` when imported.
pub fn global_module(css: &str) -> String {
    format!(
        "const css = `{}`;\n\
         const style = document.createElement(\"style\");\n\
         style.textContent = css;\n\
         document.head.appendChild(style);\n\
         export default css;\n",
        escape_template(css)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_template_syntax() {
        assert_eq!(
            escape_template(r#"a::after { content: "`${x}\f0"; }"#),
            r#"a::after { content: "\`\${x}\\f0"; }"#
        );
    }

    #[test]
    fn lone_dollar_and_brace_are_kept() {
        assert_eq!(escape_template("a { b: $c }"), "a { b: $c }");
    }

    #[test]
    fn default_module_exports_text() {
        assert_eq!(default_module("p{}"), "export default `p{}`;\n");
    }

    #[test]
    fn global_module_appends_style() {
        let module = global_module("p{}");
        assert!(module.starts_with("const css = `p{}`;\n"));
        assert!(module.contains("document.head.appendChild(style);"));
        assert!(module.ends_with("export default css;\n"));
    }
}
