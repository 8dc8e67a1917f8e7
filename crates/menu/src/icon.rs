use gpui::{App, IntoElement, RenderOnce, SharedString, Window};
use gpui_component::{Icon, IconNamed};

/// Icons the menu paints, keyed by the `data-icon` names the surface uses.
#[derive(IntoElement, Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuIconName {
    Blockquote,
    Bold,
    CaseSensitive,
    ChevronDown,
    ChevronRight,
    Code,
    Ellipsis,
    Heading,
    Image,
    Italic,
    Link,
    List,
    ListOrdered,
    Redo,
    Search,
    SearchBackward,
    SearchForward,
    Strikethrough,
    Table,
    Underline,
    Undo,
}

impl MenuIconName {
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "blockquote" => Self::Blockquote,
            "bold" => Self::Bold,
            "case-sensitive" => Self::CaseSensitive,
            "chevron-down" => Self::ChevronDown,
            "chevron-right" => Self::ChevronRight,
            "code" => Self::Code,
            "more" | "ellipsis" => Self::Ellipsis,
            "heading" => Self::Heading,
            "image" => Self::Image,
            "italic" => Self::Italic,
            "link" => Self::Link,
            "bullet-list" | "bullet_list" => Self::List,
            "ordered-list" | "ordered_list" => Self::ListOrdered,
            "redo" => Self::Redo,
            "search" => Self::Search,
            "search-backward" => Self::SearchBackward,
            "search-forward" => Self::SearchForward,
            "strikethrough" => Self::Strikethrough,
            "table" => Self::Table,
            "underline" => Self::Underline,
            "undo" => Self::Undo,
            _ => return None,
        })
    }
}

impl IconNamed for MenuIconName {
    fn path(self) -> SharedString {
        match self {
            Self::Blockquote => "icons/text-quote.svg",
            Self::Bold => "icons/bold.svg",
            Self::CaseSensitive => "icons/case-sensitive.svg",
            Self::ChevronDown => "icons/chevron-down.svg",
            Self::ChevronRight => "icons/chevron-right.svg",
            Self::Code => "icons/code-xml.svg",
            Self::Ellipsis => "icons/ellipsis.svg",
            Self::Heading => "icons/heading.svg",
            Self::Image => "icons/image.svg",
            Self::Italic => "icons/italic.svg",
            Self::Link => "icons/link.svg",
            Self::List => "icons/list.svg",
            Self::ListOrdered => "icons/list-ordered.svg",
            Self::Redo => "icons/redo-2.svg",
            Self::Search => "icons/search.svg",
            Self::SearchBackward => "icons/arrow-up.svg",
            Self::SearchForward => "icons/arrow-down.svg",
            Self::Strikethrough => "icons/strikethrough.svg",
            Self::Table => "icons/table.svg",
            Self::Underline => "icons/underline.svg",
            Self::Undo => "icons/undo-2.svg",
        }
        .into()
    }
}

impl RenderOnce for MenuIconName {
    fn render(self, _: &mut Window, _: &mut App) -> impl IntoElement {
        Icon::new(self)
    }
}
