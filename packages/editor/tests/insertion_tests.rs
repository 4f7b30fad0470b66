//! Schema-constrained insertion against each known container.

use fb2_editor::{
    classify, has_title, insert_inside, structural_children, validate_container, EditError,
    ElementKind, History, NodeId, SchemaTable, Tree,
};

fn container(tree: &mut Tree, class: &str) -> (NodeId, NodeId) {
    let root = tree.new_element("html");
    let node = tree.new_element_with_attr("div", "class", class);
    tree.append_inside(root, node).unwrap();
    (root, node)
}

fn insert(
    table: &SchemaTable,
    tree: &mut Tree,
    history: &mut History,
    target: NodeId,
    kind: ElementKind,
) -> NodeId {
    let command = insert_inside(table, tree, target, kind).unwrap();
    history.apply(tree, command).unwrap();
    history.selection().expect("insert selects the new element")
}

fn kinds_of(tree: &Tree, target: NodeId) -> Vec<ElementKind> {
    structural_children(tree, target)
        .into_iter()
        .filter_map(|child| classify(tree, child))
        .collect()
}

#[test]
fn test_scenario_a_title_image_epigraph() {
    let mut tree = Tree::new();
    let table = SchemaTable::standard();
    let (_, section) = container(&mut tree, "section");
    let mut history = History::new();

    let title = insert(&table, &mut tree, &mut history, section, ElementKind::Title);
    assert_eq!(tree.first_child(section), Some(title));
    assert!(has_title(&tree, section));

    let image = insert(&table, &mut tree, &mut history, section, ElementKind::Image);
    assert_eq!(tree.prev_sibling(image), Some(title));

    let epigraph = insert(
        &table,
        &mut tree,
        &mut history,
        section,
        ElementKind::Epigraph,
    );
    assert_eq!(tree.prev_sibling(epigraph), Some(title));
    assert_eq!(tree.next_sibling(epigraph), Some(image));
}

#[test]
fn test_body_image_comes_before_title() {
    let mut tree = Tree::new();
    let table = SchemaTable::standard();
    let (_, body) = container(&mut tree, "body");
    let mut history = History::new();

    insert(&table, &mut tree, &mut history, body, ElementKind::Title);
    insert(&table, &mut tree, &mut history, body, ElementKind::Image);

    assert_eq!(
        kinds_of(&tree, body),
        vec![ElementKind::Image, ElementKind::Title]
    );
}

#[test]
fn test_poem_trailing_kinds_sort_after_free_content() {
    let mut tree = Tree::new();
    let table = SchemaTable::standard();
    let (_, poem) = container(&mut tree, "poem");
    let mut history = History::new();

    insert(&table, &mut tree, &mut history, poem, ElementKind::Stanza);
    insert(&table, &mut tree, &mut history, poem, ElementKind::Date);
    insert(
        &table,
        &mut tree,
        &mut history,
        poem,
        ElementKind::TextAuthor,
    );
    insert(&table, &mut tree, &mut history, poem, ElementKind::Title);

    assert_eq!(
        kinds_of(&tree, poem),
        vec![
            ElementKind::Title,
            ElementKind::Stanza,
            ElementKind::TextAuthor,
            ElementKind::Date,
        ]
    );
}

#[test]
fn test_epigraph_text_author_goes_last() {
    let mut tree = Tree::new();
    let table = SchemaTable::standard();
    let (_, epigraph) = container(&mut tree, "epigraph");
    let mut history = History::new();

    // free paragraph content occupies the wildcard slot
    let para = tree.new_element("p");
    tree.append_inside(epigraph, para).unwrap();

    let author = insert(
        &table,
        &mut tree,
        &mut history,
        epigraph,
        ElementKind::TextAuthor,
    );
    assert_eq!(tree.last_child(epigraph), Some(author));
}

#[test]
fn test_refusals_are_no_ops() {
    let mut tree = Tree::new();
    let table = SchemaTable::standard();
    let (root, section) = container(&mut tree, "section");
    let before = tree.outline(root);

    // kind absent from the schema
    assert!(matches!(
        insert_inside(&table, &mut tree, section, ElementKind::Stanza),
        Err(EditError::KindMiss { .. })
    ));
    assert_eq!(tree.outline(root), before);

    // container without a schema
    let date = tree.new_element_with_attr("div", "class", "date");
    tree.append_inside(section, date).unwrap();
    let before = tree.outline(root);
    assert_eq!(
        insert_inside(&table, &mut tree, date, ElementKind::Title),
        Err(EditError::SchemaMiss(ElementKind::Date))
    );
    assert_eq!(tree.outline(root), before);
}

#[test]
fn test_validation_tracks_history() {
    let mut tree = Tree::new();
    let table = SchemaTable::standard();
    let (_, poem) = container(&mut tree, "poem");
    let mut history = History::new();

    assert_eq!(validate_container(&table, &tree, poem).len(), 1);

    insert(&table, &mut tree, &mut history, poem, ElementKind::Stanza);
    assert!(validate_container(&table, &tree, poem).is_empty());

    history.undo(&mut tree).unwrap();
    let violations = validate_container(&table, &tree, poem);
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].kind, ElementKind::Stanza);
}
