//! Server-rendered HTML pages.

use std::path::Path;

use maud::{html, Markup, PreEscaped, DOCTYPE};

use crate::config::Config;
use crate::models::CatalogStats;

const RESCAN_SCRIPT: &str = r#"
document.getElementById('rescan').addEventListener('click', async (event) => {
  const button = event.currentTarget;
  button.disabled = true;
  const response = await fetch('/rescan', { method: 'POST' });
  if (response.ok) {
    location.reload();
  } else {
    button.disabled = false;
    alert('Rescan failed');
  }
});
"#;

/// A linkable gallery entry: display name plus root-relative path.
#[derive(Debug, Clone)]
pub struct Item {
    pub name: String,
    pub path: String,
}

pub struct Settings<'a> {
    pub config: &'a Config,
    pub stats: Option<CatalogStats>,
}

fn layout(title: &str, body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) " · picdex" }
                link rel="stylesheet" href="/output.css";
            }
            body {
                header.navbar {
                    a href="/" { "Home" }
                    a href="/gallery" { "Gallery" }
                    a href="/upload" { "Upload" }
                    a href="/settings" { "Settings" }
                    button #rescan type="button" { "Rescan" }
                }
                main { (body) }
                script { (PreEscaped(RESCAN_SCRIPT)) }
            }
        }
    }
}

pub fn index() -> Markup {
    layout(
        "Home",
        html! {
            h1 { "picdex" }
            p { "Browse the pictures in your gallery folder." }
            a.button href="/gallery" { "Open the gallery" }
        },
    )
}

pub fn gallery(dir: &str, directories: &[Item], images: &[Item]) -> Markup {
    let title = if dir.is_empty() {
        "Gallery".to_string()
    } else {
        format!("Gallery · {dir}")
    };

    layout(
        &title,
        html! {
            (breadcrumbs(dir))
            @if directories.is_empty() && images.is_empty() {
                p.empty { "Nothing here yet. Add pictures to the gallery folder and rescan." }
            }
            @if !directories.is_empty() {
                ul.directories {
                    @for item in directories {
                        li { a href={ "/gallery/" (url_path(&item.path)) } { (item.name) } }
                    }
                }
            }
            @if !images.is_empty() {
                div.images {
                    @for item in images {
                        a.picture href={ "/pic/" (url_path(&item.path)) } {
                            img src={ "/pictures/" (url_path(&item.path)) } alt=(item.name) loading="lazy";
                        }
                    }
                }
            }
        },
    )
}

pub fn picture(name: &str, dimensions: Option<(u32, u32)>) -> Markup {
    let (parent, file_name) = name.rsplit_once('/').unwrap_or(("", name));

    layout(
        file_name,
        html! {
            (breadcrumbs(parent))
            figure.picture {
                img src={ "/pictures/" (url_path(name)) } alt=(file_name);
                figcaption {
                    (file_name)
                    @if let Some((width, height)) = dimensions {
                        " · " (width) " × " (height)
                    }
                }
            }
        },
    )
}

pub fn upload(root: &Path) -> Markup {
    layout(
        "Upload",
        html! {
            h1 { "Upload" }
            p {
                "Copy pictures into "
                code { (root.display().to_string()) }
                " and press Rescan to add them to the gallery."
            }
        },
    )
}

pub fn settings(settings: &Settings<'_>) -> Markup {
    let config = settings.config;

    layout(
        "Settings",
        html! {
            h1 { "Settings" }
            dl.settings {
                dt { "Gallery folder" } dd { code { (config.root.display().to_string()) } }
                dt { "Catalog" } dd { code { (config.database.display().to_string()) } }
                dt { "Listening on" } dd { code { (config.listen_addr().to_string()) } }
                dt { "Follow symlinks" } dd { (if config.follow_symlinks { "yes" } else { "no" }) }
                dt { "Maximum depth" } dd {
                    @if config.max_depth == 0 { "unlimited" } @else { (config.max_depth) }
                }
            }
            h2 { "Catalog" }
            @match settings.stats {
                Some(stats) => {
                    dl.stats {
                        dt { "Images" } dd { (stats.images) }
                        dt { "Directories" } dd { (stats.directories) }
                        dt { "Database size" } dd { (format_size(stats.db_size_bytes)) }
                    }
                }
                None => p.error { "Catalog statistics are unavailable." }
            }
        },
    )
}

pub fn not_found() -> Markup {
    layout(
        "Not found",
        html! {
            h1 { "Not found" }
            p { a href="/gallery" { "Back to the gallery" } }
        },
    )
}

fn breadcrumbs(dir: &str) -> Markup {
    html! {
        nav.breadcrumbs {
            a href="/gallery" { "Gallery" }
            @for (name, path) in crumbs(dir) {
                " / "
                a href={ "/gallery/" (url_path(&path)) } { (name) }
            }
        }
    }
}

/// Each ancestor of `dir` paired with its root-relative path.
fn crumbs(dir: &str) -> Vec<(&str, String)> {
    let mut path = String::new();
    dir.split('/')
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            if !path.is_empty() {
                path.push('/');
            }
            path.push_str(segment);
            (segment, path.clone())
        })
        .collect()
}

/// Percent-encodes each segment of a root-relative path for use in a URL.
fn url_path(path: &str) -> String {
    path.split('/')
        .map(urlencoding::encode)
        .collect::<Vec<_>>()
        .join("/")
}

fn format_size(bytes: i64) -> String {
    const KIB: i64 = 1024;
    const MIB: i64 = 1024 * KIB;
    if bytes >= MIB {
        format!("{:.1} MiB", bytes as f64 / MIB as f64)
    } else {
        format!("{:.1} KiB", bytes as f64 / KIB as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_path_encodes_segments() {
        assert_eq!(url_path("sub dir/a#1.png"), "sub%20dir/a%231.png");
        assert_eq!(url_path("a.png"), "a.png");
    }

    #[test]
    fn test_crumbs() {
        assert!(crumbs("").is_empty());
        assert_eq!(
            crumbs("a/b/c"),
            vec![
                ("a", "a".to_string()),
                ("b", "a/b".to_string()),
                ("c", "a/b/c".to_string()),
            ]
        );
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(2048), "2.0 KiB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.0 MiB");
    }

    #[test]
    fn test_gallery_escapes_names() {
        let images = [Item {
            name: "<b>.png".to_string(),
            path: "<b>.png".to_string(),
        }];
        let page = gallery("", &[], &images).into_string();

        assert!(page.contains("&lt;b&gt;.png"));
        assert!(!page.contains("<b>.png"));
    }

    #[test]
    fn test_picture_without_dimensions() {
        let page = picture("sub/a.png", None).into_string();
        assert!(page.contains("/pictures/sub/a.png"));
        assert!(page.contains("/gallery/sub"));
        assert!(!page.contains(" × "));
    }
}
