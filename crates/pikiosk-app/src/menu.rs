//! Static menu tree
//!
//! Menus live in an arena and refer to each other by [`MenuNodeId`]. The tree
//! is built once and never changes; the stream list is not part of it.

/// Index of a node in the [`MenuTree`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MenuNodeId(usize);

/// What activating a menu entry does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuItem {
    Root,
    SelectStream,
    Settings,
    SetServerIp,
    Back,
}

#[derive(Debug, Clone)]
pub struct MenuNode {
    pub label: &'static str,
    pub item: MenuItem,
    pub children: Vec<MenuNodeId>,
    pub parent: Option<MenuNodeId>,
}

#[derive(Debug, Clone)]
pub struct MenuTree {
    nodes: Vec<MenuNode>,
}

impl MenuTree {
    /// Main menu ("Select Stream", "Settings") with the settings submenu
    /// ("Set Server IP", "Back").
    pub fn standard() -> Self {
        let mut tree = Self { nodes: Vec::new() };
        let root = tree.add("Main Menu", MenuItem::Root, None);
        tree.add("Select Stream", MenuItem::SelectStream, Some(root));
        let settings = tree.add("Settings", MenuItem::Settings, Some(root));
        tree.add("Set Server IP", MenuItem::SetServerIp, Some(settings));
        tree.add("Back", MenuItem::Back, Some(settings));
        tree
    }

    fn add(&mut self, label: &'static str, item: MenuItem, parent: Option<MenuNodeId>) -> MenuNodeId {
        let id = MenuNodeId(self.nodes.len());
        self.nodes.push(MenuNode {
            label,
            item,
            children: Vec::new(),
            parent,
        });
        if let Some(MenuNodeId(p)) = parent {
            self.nodes[p].children.push(id);
        }
        id
    }

    pub fn root(&self) -> MenuNodeId {
        MenuNodeId(0)
    }

    pub fn node(&self, id: MenuNodeId) -> &MenuNode {
        &self.nodes[id.0]
    }

    pub fn children(&self, id: MenuNodeId) -> &[MenuNodeId] {
        &self.node(id).children
    }

    /// The `index`-th child of `id`.
    pub fn child(&self, id: MenuNodeId, index: usize) -> Option<&MenuNode> {
        self.children(id).get(index).map(|&c| self.node(c))
    }

    pub fn parent(&self, id: MenuNodeId) -> Option<MenuNodeId> {
        self.node(id).parent
    }

    /// First node with the given activation kind.
    pub fn find(&self, item: MenuItem) -> Option<MenuNodeId> {
        self.nodes
            .iter()
            .position(|n| n.item == item)
            .map(MenuNodeId)
    }

    /// Position of `item` among the children of `id`.
    pub fn position(&self, id: MenuNodeId, item: MenuItem) -> Option<usize> {
        self.children(id)
            .iter()
            .position(|&c| self.node(c).item == item)
    }

    pub fn labels(&self, id: MenuNodeId) -> Vec<&'static str> {
        self.children(id).iter().map(|&c| self.node(c).label).collect()
    }
}
