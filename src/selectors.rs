use std::collections::BTreeMap;

use crate::page::Page;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ElementKey {
    Hero,
    CtaMain,
    CtaLearnMore,
    ScrollArrow,
    Nav,
    FeatureItems,
    Shapes,
    MobileMenuToggle,
    NavMenu,
    ConnectionModal,
    NavCta,
    EsimCta,
    NumbersCta,
    TariffButtons,
    ContactForm,
    AcceptCall,
    StickyCta,
    StickyCtaButton,
    ModalClose,
    Slides,
    ParticlesField,
    Features,
    LoadingState,
}

impl ElementKey {
    pub const ALL: [ElementKey; 23] = [
        ElementKey::Hero,
        ElementKey::CtaMain,
        ElementKey::CtaLearnMore,
        ElementKey::ScrollArrow,
        ElementKey::Nav,
        ElementKey::FeatureItems,
        ElementKey::Shapes,
        ElementKey::MobileMenuToggle,
        ElementKey::NavMenu,
        ElementKey::ConnectionModal,
        ElementKey::NavCta,
        ElementKey::EsimCta,
        ElementKey::NumbersCta,
        ElementKey::TariffButtons,
        ElementKey::ContactForm,
        ElementKey::AcceptCall,
        ElementKey::StickyCta,
        ElementKey::StickyCtaButton,
        ElementKey::ModalClose,
        ElementKey::Slides,
        ElementKey::ParticlesField,
        ElementKey::Features,
        ElementKey::LoadingState,
    ];

    /// Keys that resolve to every match instead of the first one.
    pub fn is_multi(self) -> bool {
        matches!(
            self,
            ElementKey::FeatureItems
                | ElementKey::Shapes
                | ElementKey::TariffButtons
                | ElementKey::ModalClose
                | ElementKey::Slides
        )
    }

    fn default_selector(self) -> &'static str {
        match self {
            ElementKey::Hero => "#hero",
            ElementKey::CtaMain => "#cta-main",
            ElementKey::CtaLearnMore => "#cta-learn-more",
            ElementKey::ScrollArrow => ".scroll-arrow",
            ElementKey::Nav => ".nav",
            ElementKey::FeatureItems => ".feature-item",
            ElementKey::Shapes => ".shape",
            ElementKey::MobileMenuToggle => "#mobileMenuToggle",
            ElementKey::NavMenu => ".nav-menu",
            ElementKey::ConnectionModal => "#connectionModal",
            ElementKey::NavCta => "#nav-cta",
            ElementKey::EsimCta => "#esim-cta",
            ElementKey::NumbersCta => "#numbers-cta",
            ElementKey::TariffButtons => ".tariff-button",
            ElementKey::ContactForm => "#contact-form",
            ElementKey::AcceptCall => "#accept-call",
            ElementKey::StickyCta => "#stickyCta",
            ElementKey::StickyCtaButton => "#sticky-cta-button",
            ElementKey::ModalClose => "[data-modal-close]",
            ElementKey::Slides => ".luxury-slideshow .slide",
            ElementKey::ParticlesField => ".particles-field",
            ElementKey::Features => "#features",
            ElementKey::LoadingState => "#loadingState",
        }
    }
}

/// Fixed logical-name to selector table for the landing markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorMap {
    entries: BTreeMap<ElementKey, &'static str>,
}

impl Default for SelectorMap {
    fn default() -> Self {
        Self {
            entries: ElementKey::ALL
                .iter()
                .map(|key| (*key, key.default_selector()))
                .collect(),
        }
    }
}

impl SelectorMap {
    #[cfg(test)]
    pub fn selector(&self, key: ElementKey) -> &'static str {
        self.entries
            .get(&key)
            .copied()
            .unwrap_or_else(|| key.default_selector())
    }

    pub fn iter(&self) -> impl Iterator<Item = (ElementKey, &'static str)> + '_ {
        self.entries.iter().map(|(key, selector)| (*key, *selector))
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Cached<E> {
    Single(Option<E>),
    Many(Vec<E>),
}

/// Elements resolved once at start-up. Nothing is re-queried afterwards.
#[derive(Debug, Clone)]
pub struct ElementCache<E> {
    entries: BTreeMap<ElementKey, Cached<E>>,
}

impl<E: Clone> ElementCache<E> {
    pub fn resolve<P: Page<Element = E>>(page: &P, map: &SelectorMap) -> Self {
        let entries = map
            .iter()
            .map(|(key, selector)| {
                let cached = if key.is_multi() {
                    Cached::Many(page.query_all(selector))
                } else {
                    let found = page.query(selector);
                    if found.is_none() {
                        log::debug!("{:?} ({}) not present, skipping", key, selector);
                    }
                    Cached::Single(found)
                };
                (key, cached)
            })
            .collect();
        Self { entries }
    }

    /// The element for a single-match key.
    pub fn get(&self, key: ElementKey) -> Option<&E> {
        match self.entries.get(&key) {
            Some(Cached::Single(found)) => found.as_ref(),
            _ => None,
        }
    }

    /// All elements for a multi-match key, in document order.
    pub fn all(&self, key: ElementKey) -> &[E] {
        match self.entries.get(&key) {
            Some(Cached::Many(found)) => found,
            _ => &[],
        }
    }
}
