// Page shell shared by every route.
// Head metadata from the SEO config, the design palette, navigation, and footer.

use maud::{DOCTYPE, Markup, PreEscaped, html};

use crate::config::Config;

const DEFAULT_VIEWPORT: &str = "width=device-width, initial-scale=1.0";

const NAV: &[(&str, &str)] = &[
    ("/", "Home"),
    ("/projects", "Projects"),
    ("/skills", "Skills"),
    ("/about", "About"),
    ("/testimonials", "Testimonials"),
    ("/blog", "Blog"),
    ("/contact", "Contact"),
];

/// Color variables for each design.
fn palette(design: &str) -> &'static str {
    match design {
        "midnight" => ":root{--bg:#0f1024;--fg:#e6e6f5;--fg2:#a9a9d0;--accent:#8b5cf6;--surface:#191a3a;--border:#2b2c5a}",
        "sunset" => ":root{--bg:#fff7ed;--fg:#431407;--fg2:#9a3412;--accent:#ea580c;--surface:#ffedd5;--border:#fdba74}",
        "caprihan" => ":root{--bg:#f0fdfa;--fg:#0c4a6e;--fg2:#0f766e;--accent:#0284c7;--surface:#ccfbf1;--border:#99f6e4}",
        "ocean" => ":root{--bg:#042f2e;--fg:#ccfbf1;--fg2:#5eead4;--accent:#14b8a6;--surface:#134e4a;--border:#115e59}",
        _ => ":root{--bg:#fafafa;--fg:#111;--fg2:#555;--accent:#2563eb;--surface:#fff;--border:#e5e7eb}",
    }
}

const BASE_CSS: &str = r#"
*{margin:0;padding:0;box-sizing:border-box}
body{font-family:Inter,-apple-system,BlinkMacSystemFont,"Segoe UI",Roboto,sans-serif;line-height:1.6;color:var(--fg);background:var(--bg);min-height:100vh;display:flex;flex-direction:column}
header,main,footer{width:100%;max-width:860px;margin:0 auto;padding:1rem}
main{flex:1}
nav{display:flex;flex-wrap:wrap;gap:1rem;align-items:center}
nav .brand{font-weight:800;font-size:1.2rem;margin-right:auto;color:var(--fg)}
a{color:var(--accent);text-decoration:none}
a:hover{text-decoration:underline}
h1{font-size:2rem;margin:1rem 0}
h2{font-size:1.3rem;margin:1.5rem 0 .75rem}
.grid{display:grid;grid-template-columns:repeat(auto-fill,minmax(240px,1fr));gap:1rem}
.card{background:var(--surface);border:1px solid var(--border);border-radius:10px;padding:1rem}
.muted{color:var(--fg2);font-size:.9rem}
.badge{display:inline-block;padding:.1rem .5rem;border-radius:999px;border:1px solid var(--border);font-size:.8rem}
.live{color:#dc2626;font-weight:700}
.notice{padding:.75rem 1rem;border-radius:8px;margin:1rem 0;border:1px solid var(--border)}
.notice.error{border-color:#dc2626}
.notice.success{border-color:#16a34a}
form label{display:block;margin-top:.75rem}
form input,form textarea{width:100%;padding:.5rem;border:1px solid var(--border);border-radius:6px;background:var(--surface);color:var(--fg)}
form button{margin-top:1rem;padding:.5rem 1.25rem;border:0;border-radius:6px;background:var(--accent);color:#fff;cursor:pointer}
.post img{max-width:100%}
.post pre{overflow-x:auto;padding:.75rem;background:var(--surface);border-radius:6px}
footer{font-size:.85rem;color:var(--fg2);text-align:center}
"#;

/// Wrap `body` in the full site layout.
pub fn page(config: &Config, title: &str, body: Markup) -> Markup {
    let site = &config.site;
    let seo = &site.seo;
    let site_name = if site.site_name.is_empty() {
        "Portfolio"
    } else {
        site.site_name.as_str()
    };
    let full_title = if title.is_empty() {
        site_name.to_string()
    } else {
        format!("{title} | {site_name}")
    };
    let viewport = if seo.viewport.is_empty() {
        DEFAULT_VIEWPORT
    } else {
        seo.viewport.as_str()
    };
    let og_title = if seo.title.is_empty() {
        full_title.as_str()
    } else {
        seo.title.as_str()
    };
    let design = config.design();

    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content=(viewport);
                title { (full_title) }
                @if !seo.description.is_empty() {
                    meta name="description" content=(seo.description);
                }
                @if !seo.keywords.is_empty() {
                    meta name="keywords" content=(seo.keywords);
                }
                @if !seo.author.is_empty() {
                    meta name="author" content=(seo.author);
                }
                meta property="og:title" content=(og_title);
                meta property="og:type" content="website";
                style { (PreEscaped(palette(design))) }
                style { (PreEscaped(BASE_CSS)) }
                link rel="stylesheet" href="/css/site.css";
            }
            body class={ "design-" (design) } {
                header {
                    nav {
                        a class="brand" href="/" { (site_name) }
                        @for (href, label) in NAV {
                            a href=(href) { (label) }
                        }
                    }
                }
                main { (body) }
                footer {
                    "© " (site_name)
                    @if !site.github_username.is_empty() {
                        " · "
                        a href={ "https://github.com/" (site.github_username) } { "GitHub" }
                    }
                    @if !site.twitch_username.is_empty() {
                        " · "
                        a href={ "https://twitch.tv/" (site.twitch_username) } { "Twitch" }
                    }
                }
            }
        }
    }
}
