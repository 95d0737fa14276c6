use stemma_protocol::{Chunk, Direction, Label, Node, NodeId};

struct Slot {
    chunk: Chunk,
    label: Option<Label>,
    left: Vec<NodeId>,
    right: Vec<NodeId>,
}

/// A sentence under reduction: every node lives in an arena addressed by a
/// stable [`NodeId`], and `live` lists the top-level sequence in order.
///
/// Nodes only leave `live` through [`Sentence::splice`], which hands them to
/// exactly one head, so the child lists always form a forest.
pub struct Sentence {
    slots: Vec<Slot>,
    live: Vec<NodeId>,
}

impl Sentence {
    pub fn new(chunks: Vec<Chunk>) -> Self {
        let slots: Vec<Slot> = chunks
            .into_iter()
            .map(|chunk| Slot {
                chunk,
                label: None,
                left: Vec::new(),
                right: Vec::new(),
            })
            .collect();
        let live = (0..slots.len() as u32).map(NodeId::new).collect();

        Self { slots, live }
    }

    /// Length of the top-level sequence.
    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    pub fn live(&self) -> &[NodeId] {
        &self.live
    }

    pub fn node(&self, id: NodeId) -> NodeRef<'_> {
        NodeRef { sentence: self, id }
    }

    /// The node at `pos` in the top-level sequence.
    pub fn at(&self, pos: usize) -> NodeRef<'_> {
        self.node(self.live[pos])
    }

    pub fn root(&self) -> Option<NodeId> {
        (0..self.slots.len() as u32)
            .map(NodeId::new)
            .find(|id| self.slots[id.index()].label == Some(Label::Root))
    }

    /// Writes the root label. Root identification calls this at most once per
    /// sentence and the matcher never lets a root become a dependent, so the
    /// label is never overwritten afterwards.
    pub(crate) fn mark_root(&mut self, id: NodeId) {
        self.slots[id.index()].label = Some(Label::Root);
    }

    /// Fuses the pair at `pos`/`pos + 1` of the top-level sequence. The
    /// dependent is labeled, appended to the head's child list on the side
    /// it came from, and removed from the top-level sequence.
    pub(crate) fn splice(&mut self, pos: usize, direction: Direction, label: Label) -> NodeId {
        let (head_pos, dependent_pos) = match direction {
            Direction::HeadLeft => (pos, pos + 1),
            Direction::HeadRight => (pos + 1, pos),
        };
        let head = self.live[head_pos];
        let dependent = self.live.remove(dependent_pos);

        self.slots[dependent.index()].label = Some(label);
        let slot = &mut self.slots[head.index()];
        match direction {
            Direction::HeadLeft => slot.right.push(dependent),
            Direction::HeadRight => slot.left.push(dependent),
        }

        head
    }

    /// Detaches the arena into owned trees, one per top-level node.
    pub fn into_forest(self) -> Vec<Node> {
        let Sentence { slots, live } = self;
        let mut slots: Vec<Option<Slot>> = slots.into_iter().map(Some).collect();

        live.into_iter()
            .filter_map(|id| build(&mut slots, id))
            .collect()
    }
}

fn build(slots: &mut [Option<Slot>], id: NodeId) -> Option<Node> {
    let slot = slots.get_mut(id.index())?.take()?;
    let left = slot.left.into_iter().filter_map(|child| build(slots, child)).collect();
    let right = slot.right.into_iter().filter_map(|child| build(slots, child)).collect();

    Some(Node {
        chunk: slot.chunk,
        label: slot.label,
        left,
        right,
    })
}

/// Read-only view of one arena node.
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    sentence: &'a Sentence,
    id: NodeId,
}

impl<'a> NodeRef<'a> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    fn slot(&self) -> &'a Slot {
        &self.sentence.slots[self.id.index()]
    }

    pub fn chunk(&self) -> &'a Chunk {
        &self.slot().chunk
    }

    pub fn label(&self) -> Option<Label> {
        self.slot().label
    }

    pub fn is_root(&self) -> bool {
        self.label() == Some(Label::Root)
    }

    pub fn left(&self) -> impl Iterator<Item = NodeRef<'a>> + 'a {
        let sentence = self.sentence;
        self.slot().left.iter().map(move |&id| sentence.node(id))
    }

    pub fn right(&self) -> impl Iterator<Item = NodeRef<'a>> + 'a {
        let sentence = self.sentence;
        self.slot().right.iter().map(move |&id| sentence.node(id))
    }

    pub fn has_left_child_labeled(&self, label: Label) -> bool {
        self.left().any(|child| child.label() == Some(label))
    }
}

impl std::fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("kind", &self.chunk().kind)
            .field("text", &self.chunk().text())
            .field("label", &self.label())
            .finish()
    }
}
