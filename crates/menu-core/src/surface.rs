use std::collections::{BTreeMap, BTreeSet};

use slotmap::{SlotMap, new_key_type};

use crate::geometry::Rect;

new_key_type! {
    pub struct NodeId;
}

#[derive(Debug, Clone, Default)]
pub struct Node {
    pub tag: String,
    pub classes: BTreeSet<String>,
    pub attrs: BTreeMap<String, String>,
    pub text: Option<String>,
    pub hidden: bool,
    /// Absolute placement for floating nodes (dialogs, overlays).
    pub frame: Option<Rect>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// Retained node tree the menu paints into and the host renders from.
///
/// Setters only count as a mutation when they change something, so calling
/// an update twice with the same state leaves [`Surface::mutation_count`]
/// untouched the second time.
pub struct Surface {
    nodes: SlotMap<NodeId, Node>,
    body: NodeId,
    mutations: u64,
}

impl Default for Surface {
    fn default() -> Self {
        Self::new()
    }
}

impl Surface {
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let body = nodes.insert(Node {
            tag: "body".to_string(),
            ..Node::default()
        });
        Self {
            nodes,
            body,
            mutations: 0,
        }
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    pub fn mutation_count(&self) -> u64 {
        self.mutations
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn exists(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn create(&mut self, tag: &str) -> NodeId {
        self.mutations += 1;
        self.nodes.insert(Node {
            tag: tag.to_string(),
            ..Node::default()
        })
    }

    pub fn create_with_class(&mut self, tag: &str, class: &str) -> NodeId {
        let id = self.create(tag);
        self.add_class(id, class);
        id
    }

    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        let id = self.create("#text");
        if let Some(node) = self.nodes.get_mut(id) {
            node.text = Some(text.into());
        }
        id
    }

    pub fn append(&mut self, parent: NodeId, child: NodeId) {
        if !self.nodes.contains_key(parent) || !self.nodes.contains_key(child) {
            return;
        }
        self.detach(child);
        self.nodes[parent].children.push(child);
        self.nodes[child].parent = Some(parent);
        self.mutations += 1;
    }

    /// Inserts `child` right after `reference` under the same parent. A
    /// detached reference falls back to appending to the body.
    pub fn insert_after(&mut self, reference: NodeId, child: NodeId) {
        if reference == child || !self.nodes.contains_key(child) {
            return;
        }
        let Some(parent) = self.parent(reference) else {
            self.append(self.body, child);
            return;
        };
        self.detach(child);
        let siblings = &mut self.nodes[parent].children;
        let index = siblings
            .iter()
            .position(|id| *id == reference)
            .map_or(siblings.len(), |ix| ix + 1);
        siblings.insert(index, child);
        self.nodes[child].parent = Some(parent);
        self.mutations += 1;
    }

    /// Unlinks `id` from its parent, keeping the subtree alive.
    pub fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.nodes.get(id).and_then(|node| node.parent) else {
            return;
        };
        if let Some(parent) = self.nodes.get_mut(parent) {
            parent.children.retain(|child| *child != id);
        }
        self.nodes[id].parent = None;
        self.mutations += 1;
    }

    /// Destroys `id` and its subtree. Returns every removed id.
    pub fn remove(&mut self, id: NodeId) -> Vec<NodeId> {
        if id == self.body || !self.nodes.contains_key(id) {
            return Vec::new();
        }
        self.detach(id);

        let mut removed = Vec::new();
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if let Some(node) = self.nodes.remove(next) {
                stack.extend(node.children);
                removed.push(next);
            }
        }
        self.mutations += 1;
        removed
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id).and_then(|node| node.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(id)
            .map(|node| node.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let siblings = self.children(parent);
        let ix = siblings.iter().position(|child| *child == id)?;
        siblings.get(ix + 1).copied()
    }

    /// Whether `id` is `ancestor` or lives somewhere below it.
    pub fn contains(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self.parent(node);
        }
        false
    }

    pub fn is_attached(&self, id: NodeId) -> bool {
        self.exists(id) && self.contains(self.body, id)
    }

    /// Attached and neither the node nor any ancestor is hidden.
    pub fn is_displayed(&self, id: NodeId) -> bool {
        if !self.is_attached(id) {
            return false;
        }
        let mut current = Some(id);
        while let Some(node) = current {
            if self.is_hidden(node) {
                return false;
            }
            current = self.parent(node);
        }
        true
    }

    /// Path from `id` up to the root, `id` first.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut path = Vec::new();
        let mut current = self.exists(id).then_some(id);
        while let Some(node) = current {
            path.push(node);
            current = self.parent(node);
        }
        path
    }

    pub fn set_class(&mut self, id: NodeId, class: &str, on: bool) -> bool {
        let Some(node) = self.nodes.get_mut(id) else {
            return false;
        };
        let changed = if on {
            node.classes.insert(class.to_string())
        } else {
            node.classes.remove(class)
        };
        if changed {
            self.mutations += 1;
        }
        changed
    }

    pub fn add_class(&mut self, id: NodeId, class: &str) {
        for class in class.split_whitespace() {
            self.set_class(id, class, true);
        }
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.nodes
            .get(id)
            .is_some_and(|node| node.classes.contains(class))
    }

    pub fn set_attr(&mut self, id: NodeId, name: &str, value: impl Into<String>) {
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        let value = value.into();
        if node.attrs.get(name) != Some(&value) {
            node.attrs.insert(name.to_string(), value);
            self.mutations += 1;
        }
    }

    pub fn remove_attr(&mut self, id: NodeId, name: &str) {
        if let Some(node) = self.nodes.get_mut(id)
            && node.attrs.remove(name).is_some()
        {
            self.mutations += 1;
        }
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.nodes
            .get(id)
            .and_then(|node| node.attrs.get(name))
            .map(String::as_str)
    }

    pub fn set_hidden(&mut self, id: NodeId, hidden: bool) {
        if let Some(node) = self.nodes.get_mut(id)
            && node.hidden != hidden
        {
            node.hidden = hidden;
            self.mutations += 1;
        }
    }

    pub fn is_hidden(&self, id: NodeId) -> bool {
        self.nodes.get(id).is_some_and(|node| node.hidden)
    }

    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) {
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        let text = text.into();
        if node.text.as_deref() != Some(text.as_str()) {
            node.text = Some(text);
            self.mutations += 1;
        }
    }

    pub fn text(&self, id: NodeId) -> Option<&str> {
        self.nodes.get(id).and_then(|node| node.text.as_deref())
    }

    /// Concatenated text of the subtree, in document order.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            let Some(node) = self.nodes.get(next) else {
                continue;
            };
            if let Some(text) = &node.text {
                out.push_str(text);
            }
            stack.extend(node.children.iter().rev());
        }
        out
    }

    pub fn set_frame(&mut self, id: NodeId, frame: Rect) {
        if let Some(node) = self.nodes.get_mut(id)
            && node.frame != Some(frame)
        {
            node.frame = Some(frame);
            self.mutations += 1;
        }
    }

    pub fn frame(&self, id: NodeId) -> Option<Rect> {
        self.nodes.get(id).and_then(|node| node.frame)
    }

    /// First attached node carrying `class`, depth first from the body.
    pub fn find_by_class(&self, class: &str) -> Option<NodeId> {
        self.find_all_by_class(class).into_iter().next()
    }

    pub fn find_all_by_class(&self, class: &str) -> Vec<NodeId> {
        let mut found = Vec::new();
        let mut stack = vec![self.body];
        while let Some(next) = stack.pop() {
            let Some(node) = self.nodes.get(next) else {
                continue;
            };
            if node.classes.contains(class) {
                found.push(next);
            }
            stack.extend(node.children.iter().rev());
        }
        found
    }
}
