use crate::page::Page;

const ICON: &str = ".feature-icon";
const CONTENT: &str = ".feature-content";

struct Treatment {
    icon_transform: &'static str,
    content_transform: &'static str,
    box_shadow: &'static str,
    border_color: &'static str,
}

const ENHANCED: Treatment = Treatment {
    icon_transform: "scale(1.15) rotate(8deg)",
    content_transform: "translateX(8px)",
    box_shadow: "0 8px 32px rgba(222, 198, 122, 0.15)",
    border_color: "rgba(222, 198, 122, 0.4)",
};

const BASELINE: Treatment = Treatment {
    icon_transform: "scale(1) rotate(0deg)",
    content_transform: "translateX(0)",
    box_shadow: "",
    border_color: "",
};

/// Exposes each item's position to CSS as `--item-index`.
pub fn index_items<P: Page>(page: &P, items: &[P::Element]) {
    for (index, item) in items.iter().enumerate() {
        page.set_style(item, "--item-index", &index.to_string());
    }
}

/// Pointer entered the item.
pub fn enhance<P: Page>(page: &P, item: &P::Element) {
    apply(page, item, &ENHANCED);
}

/// Pointer left the item.
pub fn reset<P: Page>(page: &P, item: &P::Element) {
    apply(page, item, &BASELINE);
}

fn apply<P: Page>(page: &P, item: &P::Element, treatment: &Treatment) {
    let (Some(icon), Some(content)) = (page.query_in(item, ICON), page.query_in(item, CONTENT)) else {
        return;
    };
    page.set_style(&icon, "transform", treatment.icon_transform);
    page.set_style(&content, "transform", treatment.content_transform);
    page.set_style(item, "box-shadow", treatment.box_shadow);
    page.set_style(item, "border-color", treatment.border_color);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakePage;

    #[test]
    fn hover_is_reversible() {
        let page = FakePage::new();
        let item = page.add("div", &[".feature-item"]);
        let icon = page.add_child(item, "span", &[ICON]);
        let content = page.add_child(item, "div", &[CONTENT]);

        enhance(&page, &item);
        assert_eq!(page.style(icon, "transform").as_deref(), Some("scale(1.15) rotate(8deg)"));
        assert_eq!(page.style(content, "transform").as_deref(), Some("translateX(8px)"));
        assert_eq!(
            page.style(item, "border-color").as_deref(),
            Some("rgba(222, 198, 122, 0.4)")
        );

        reset(&page, &item);
        assert_eq!(page.style(icon, "transform").as_deref(), Some("scale(1) rotate(0deg)"));
        assert_eq!(page.style(content, "transform").as_deref(), Some("translateX(0)"));
        assert_eq!(page.style(item, "box-shadow"), None);
        assert_eq!(page.style(item, "border-color"), None);
    }

    #[test]
    fn items_without_icon_are_left_alone() {
        let page = FakePage::new();
        let item = page.add("div", &[".feature-item"]);
        page.add_child(item, "div", &[CONTENT]);

        enhance(&page, &item);
        assert_eq!(page.style(item, "box-shadow"), None);
    }

    #[test]
    fn items_learn_their_index() {
        let page = FakePage::new();
        let items = vec![page.add("div", &[]), page.add("div", &[]), page.add("div", &[])];
        index_items(&page, &items);
        assert_eq!(page.style(items[2], "--item-index").as_deref(), Some("2"));
    }
}
