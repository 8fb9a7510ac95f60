#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    label: String,
    children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            children: vec![],
        }
    }

    /// Appends a child and returns it so grandchildren can be attached.
    pub fn add_line(&mut self, label: impl Into<String>) -> &mut TreeNode {
        self.children.push(TreeNode::new(label));
        self.children.last_mut().expect("child was just pushed")
    }

    fn render(&self, prefix: &str, is_last: bool, buffer: &mut String) {
        let (branch, continuation) = if is_last {
            ("└─ ", "   ")
        } else {
            ("├─ ", "│  ")
        };

        buffer.push_str(prefix);
        buffer.push_str(branch);
        buffer.push_str(&self.label);
        buffer.push('\n');

        let child_prefix = format!("{prefix}{continuation}");
        render_siblings(&self.children, &child_prefix, buffer);
    }
}

/// Multi-root tree rendered with box-drawing branches, `tree(1)` style.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreePrinter {
    roots: Vec<TreeNode>,
}

impl TreePrinter {
    pub fn add_line(&mut self, label: impl Into<String>) -> &mut TreeNode {
        self.roots.push(TreeNode::new(label));
        self.roots.last_mut().expect("root was just pushed")
    }

    pub fn render(&self) -> String {
        let mut buffer = String::new();
        render_siblings(&self.roots, "", &mut buffer);
        buffer
    }
}

fn render_siblings(nodes: &[TreeNode], prefix: &str, buffer: &mut String) {
    let size = nodes.len();

    for (idx, node) in nodes.iter().enumerate() {
        node.render(prefix, idx + 1 == size, buffer);
    }
}
