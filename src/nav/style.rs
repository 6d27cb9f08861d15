use std::collections::BTreeSet;

/// Ordered set of style class names attached to a visual element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleClasses {
    classes: BTreeSet<String>,
}

impl StyleClasses {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, class: impl Into<String>) -> bool {
        self.classes.insert(class.into())
    }

    pub fn remove(&mut self, class: &str) -> bool {
        self.classes.remove(class)
    }

    pub fn contains(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.classes.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Space-joined form for the styling layer.
    pub fn to_class_string(&self) -> String {
        self.classes.iter().cloned().collect::<Vec<_>>().join(" ")
    }
}

/// Styling as a capability attached to a plain element, instead of one
/// subclass per visual variant.
pub trait Styleable {
    fn classes(&self) -> &StyleClasses;
    fn classes_mut(&mut self) -> &mut StyleClasses;

    fn apply_class(&mut self, class: &str) {
        self.classes_mut().add(class);
    }

    fn remove_class(&mut self, class: &str) {
        self.classes_mut().remove(class);
    }

    /// Swaps class sets in one step, e.g. toggling an active/inactive pair.
    fn update_classes(&mut self, add: &[&str], remove: &[&str]) {
        for class in remove {
            self.classes_mut().remove(class);
        }
        for class in add {
            self.classes_mut().add(*class);
        }
    }
}

/// A plain visual leaf: no lifecycle participation, just an id and its
/// style classes. Concrete widgets past the rendering boundary compose
/// one of these rather than inheriting from it.
#[derive(Debug, Clone, Default)]
pub struct Visual {
    id: String,
    classes: StyleClasses,
}

impl Visual {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into(), classes: StyleClasses::new() }
    }

    pub fn with_class(mut self, class: &str) -> Self {
        self.classes.add(class);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

impl Styleable for Visual {
    fn classes(&self) -> &StyleClasses {
        &self.classes
    }

    fn classes_mut(&mut self) -> &mut StyleClasses {
        &mut self.classes
    }
}
