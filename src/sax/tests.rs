//! Behavioural tests for the tokenizer

use quickcheck_macros::quickcheck;

use super::*;
use crate::core::namespace::ns as core_ns;

fn strict(input: &str) -> Vec<Event> {
    parse_events(input, ParserOptions::strict())
}

fn loose(input: &str) -> Vec<Event> {
    parse_events(input, ParserOptions::loose())
}

fn error_messages(events: &[Event]) -> Vec<String> {
    events
        .iter()
        .filter_map(|e| match e {
            Event::Error(err) => Some(err.message.clone()),
            _ => None,
        })
        .collect()
}

fn close_names(events: &[Event]) -> Vec<&str> {
    events
        .iter()
        .filter_map(|e| match e {
            Event::CloseTag(name) => Some(name.as_str()),
            _ => None,
        })
        .collect()
}

fn joined_text(events: &[Event]) -> String {
    events
        .iter()
        .filter_map(|e| match e {
            Event::Text(text) => Some(text.as_str()),
            _ => None,
        })
        .collect()
}

fn open_tag<'a>(events: &'a [Event], name: &str) -> &'a Tag {
    events
        .iter()
        .find_map(|e| match e {
            Event::OpenTag(tag) if tag.name == name => Some(tag),
            _ => None,
        })
        .unwrap_or_else(|| panic!("no open tag {name}"))
}

/// Feed `doc` in pieces cut at the given offsets, resuming after errors
fn write_in_chunks(doc: &str, cuts: &[u8], options: ParserOptions) -> Vec<Event> {
    let mut parser = Parser::new(options, EventCollector::new());
    let mut rest = doc;
    for &cut in cuts {
        if rest.is_empty() {
            break;
        }
        let mut at = cut as usize % rest.len();
        while !rest.is_char_boundary(at) {
            at += 1;
        }
        let (head, tail) = rest.split_at(at);
        parser.write(head).unwrap();
        parser.resume();
        rest = tail;
    }
    parser.write(rest).unwrap();
    parser.end();
    parser.into_handler().take_events()
}

// ============================================================================
// Elements and text
// ============================================================================

#[test]
fn test_basic_element() {
    assert_eq!(
        strict("<root>hi</root>"),
        vec![
            Event::OpenTag(Tag::new("root")),
            Event::Text("hi".into()),
            Event::CloseTag("root".into()),
            Event::End,
        ]
    );
}

#[test]
fn test_self_closing_tag() {
    let events = strict("<a/>");
    let mut tag = Tag::new("a");
    tag.self_closing = true;
    assert_eq!(
        events,
        vec![Event::OpenTag(tag), Event::CloseTag("a".into()), Event::End]
    );
}

#[test]
fn test_leading_whitespace_and_bom_are_skipped() {
    assert!(error_messages(&strict("  \n<a/>")).is_empty());
    assert!(error_messages(&strict("\u{FEFF}<a/>")).is_empty());
    assert!(!strict("  <a/>").iter().any(Event::is_text));
}

#[test]
fn test_text_outside_root() {
    let events = strict("<a/>x");
    assert_eq!(error_messages(&events), vec!["Text data outside of root node."]);
    assert_eq!(joined_text(&events), "x");

    let events = strict("x<a/>");
    assert_eq!(error_messages(&events)[0], "Non-whitespace before first tag.");
}

#[test]
fn test_trim_and_normalize() {
    let opts = ParserOptions::strict().trim(true);
    let events = parse_events("<a>  hi  </a>", opts.clone());
    assert_eq!(joined_text(&events), "hi");

    // whitespace-only text disappears entirely when trimmed
    let events = parse_events("<a> <b/> </a>", opts);
    assert!(!events.iter().any(Event::is_text));

    let opts = ParserOptions::strict().normalize(true);
    let events = parse_events("<a>a \n\t b</a>", opts);
    assert_eq!(joined_text(&events), "a b");
}

#[test]
fn test_unencoded_less_than() {
    let events = loose("<a>1 < 2</a>");
    assert_eq!(joined_text(&events), "1 < 2");

    let events = strict("<a>1 < 2</a>");
    assert_eq!(error_messages(&events), vec!["Unencoded <"]);
    assert_eq!(joined_text(&events), "1 < 2");
}

#[test]
fn test_loose_case_folding() {
    let events = loose("<Div Class=\"x\"></div>");
    let tag = open_tag(&events, "DIV");
    assert_eq!(tag.attribute("CLASS"), Some("x"));
    assert_eq!(close_names(&events), vec!["DIV"]);

    let events = parse_events("<DIV Class=x></DIV>", ParserOptions::loose().lowercase(true));
    let tag = open_tag(&events, "div");
    assert_eq!(tag.attribute("class"), Some("x"));
}

// ============================================================================
// Close-tag recovery
// ============================================================================

#[test]
fn test_close_tag_recovery_loose() {
    let events = loose("<a><b><c></a>");
    assert_eq!(close_names(&events), vec!["C", "B", "A"]);
    assert!(error_messages(&events).is_empty());
}

#[test]
fn test_close_tag_recovery_strict() {
    let events = strict("<a><b><c></a>");
    assert_eq!(close_names(&events), vec!["c", "b", "a"]);
    assert_eq!(error_messages(&events), vec!["Unexpected close tag"]);
}

#[test]
fn test_unmatched_close_tag_becomes_text() {
    let events = strict("<a></b></a>");
    assert_eq!(
        error_messages(&events),
        vec!["Unexpected close tag", "Unmatched closing tag: b"]
    );
    assert_eq!(joined_text(&events), "</b>");
    assert_eq!(close_names(&events), vec!["a"]);
}

#[test]
fn test_weird_empty_close_tag() {
    let events = strict("<a></></a>");
    assert_eq!(error_messages(&events), vec!["Weird empty close tag."]);
    assert_eq!(joined_text(&events), "</>");
    assert_eq!(close_names(&events), vec!["a"]);
}

#[test]
fn test_whitespace_in_close_tag() {
    let events = strict("<a></a  >");
    assert!(error_messages(&events).is_empty());
    assert_eq!(close_names(&events), vec!["a"]);
}

#[test]
fn test_loose_end_closes_open_elements() {
    let events = loose("<a><b>text");
    assert_eq!(
        events,
        vec![
            Event::OpenTag(Tag::new("A")),
            Event::OpenTag(Tag::new("B")),
            Event::Text("text".into()),
            Event::CloseTag("B".into()),
            Event::CloseTag("A".into()),
            Event::End,
        ]
    );
}

#[test]
fn test_strict_end_reports_unclosed() {
    let events = strict("<a><b>");
    assert_eq!(error_messages(&events), vec!["Unclosed root tag"]);
    assert!(close_names(&events).is_empty());

    // no root was opened, so only the dangling tag is reported
    let events = strict("<a");
    assert_eq!(error_messages(&events), vec!["Unexpected end"]);
}

#[test]
fn test_empty_input_is_not_an_error() {
    assert_eq!(strict(""), vec![Event::End]);
    assert_eq!(strict(" \n "), vec![Event::End]);
}

// ============================================================================
// Attributes
// ============================================================================

#[test]
fn test_attributes_in_order() {
    let events = strict("<a x=\"1\" y='2'/>");
    assert_eq!(
        &events[..2],
        &[
            Event::Attribute(Attribute::new("x", "1")),
            Event::Attribute(Attribute::new("y", "2")),
        ]
    );
    let tag = open_tag(&events, "a");
    assert_eq!(tag.attribute("y"), Some("2"));
}

#[test]
fn test_duplicate_attribute_first_wins() {
    let events = strict("<a x=\"1\" x=\"2\"/>");
    let attrs: Vec<_> = events
        .iter()
        .filter(|e| matches!(e, Event::Attribute(_)))
        .collect();
    assert_eq!(attrs.len(), 1);
    assert_eq!(open_tag(&events, "a").attribute("x"), Some("1"));
}

#[test]
fn test_unquoted_and_valueless_attributes() {
    let events = loose("<a b=c d>x</a>");
    let tag = open_tag(&events, "A");
    assert_eq!(tag.attribute("B"), Some("c"));
    assert_eq!(tag.attribute("D"), Some("d"));
    assert!(!tag.self_closing);

    let events = strict("<a b=c></a>");
    assert_eq!(error_messages(&events), vec!["Unquoted attribute value"]);
}

#[test]
fn test_valueless_attribute_before_slash() {
    let events = loose("<input disabled/>");
    let tag = open_tag(&events, "INPUT");
    assert!(tag.self_closing);
    assert_eq!(tag.attribute("DISABLED"), Some("disabled"));
}

#[test]
fn test_missing_whitespace_between_attributes() {
    let events = strict("<a x=\"1\"y=\"2\"/>");
    assert_eq!(error_messages(&events), vec!["No whitespace between attributes"]);
    assert_eq!(open_tag(&events, "a").attributes.len(), 2);
}

#[test]
fn test_attribute_entities() {
    let events = strict("<a href=\"x&amp;y&#x3D;z\"/>");
    assert_eq!(open_tag(&events, "a").attribute("href"), Some("x&y=z"));
}

// ============================================================================
// Entities
// ============================================================================

#[test]
fn test_text_entities() {
    let events = strict("<a>&amp;&#65;&#x41;&lt;&AMP;</a>");
    assert_eq!(joined_text(&events), "&AA<&");
    assert!(error_messages(&events).is_empty());
}

#[test]
fn test_unknown_entity_kept_literally() {
    let events = strict("<a>&bogus;</a>");
    assert_eq!(error_messages(&events), vec!["Invalid character entity"]);
    assert_eq!(joined_text(&events), "&bogus;");

    let events = loose("<a>&bogus;</a>");
    assert!(error_messages(&events).is_empty());
    assert_eq!(joined_text(&events), "&bogus;");
}

#[test]
fn test_interrupted_entity() {
    let events = loose("<a>a & b</a>");
    assert_eq!(joined_text(&events), "a & b");

    // the interrupting character is processed normally
    let events = loose("<a>x&<b/></a>");
    assert_eq!(joined_text(&events), "x&");
    assert_eq!(close_names(&events), vec!["B", "A"]);
}

#[test]
fn test_invalid_numeric_references() {
    let events = strict("<a>&#0;&#xD800;&#12a;</a>");
    assert_eq!(error_messages(&events).len(), 3);
    assert_eq!(joined_text(&events), "&#0;&#xD800;&#12a;");
}

#[test]
fn test_custom_entity() {
    let mut parser = Parser::new(ParserOptions::strict(), EventCollector::new());
    parser.define_entity("company", "ACME");
    parser.write("<a>&company; &amp;</a>").unwrap();
    parser.end();
    let events = parser.into_handler().take_events();
    assert_eq!(joined_text(&events), "ACME &");
}

// ============================================================================
// Markup declarations
// ============================================================================

#[test]
fn test_cdata() {
    let events = strict("<a><![CDATA[x<y]]z]]></a>");
    assert_eq!(
        &events[1..4],
        &[
            Event::OpenCData,
            Event::CData("x<y]]z".into()),
            Event::CloseCData,
        ]
    );

    let events = strict("<a><![CDATA[a]]]></a>");
    assert_eq!(events[2], Event::CData("a]".into()));
}

#[test]
fn test_empty_cdata() {
    let events = strict("<a><![CDATA[]]></a>");
    assert_eq!(&events[1..3], &[Event::OpenCData, Event::CloseCData]);
}

#[test]
fn test_comment() {
    let events = strict("<a><!-- hi --></a>");
    assert_eq!(events[1], Event::Comment(" hi ".into()));

    let events = parse_events("<a><!-- hi --></a>", ParserOptions::strict().trim(true));
    assert_eq!(events[1], Event::Comment("hi".into()));
}

#[test]
fn test_malformed_comment() {
    let events = strict("<a><!-- a -- b --></a>");
    assert_eq!(error_messages(&events), vec!["Malformed comment"]);
    assert!(events.contains(&Event::Comment(" a -- b ".into())));
}

#[test]
fn test_doctype_with_internal_subset() {
    let events = strict("<!DOCTYPE html [<!ENTITY x \"y>\">]><a/>");
    assert_eq!(
        events[0],
        Event::Doctype(" html [<!ENTITY x \"y>\">]".into())
    );
    assert!(error_messages(&events).is_empty());
}

#[test]
fn test_misplaced_doctype() {
    let events = strict("<a><!DOCTYPE x></a>");
    assert_eq!(
        error_messages(&events),
        vec!["Inappropriately located doctype declaration"]
    );
}

#[test]
fn test_processing_instruction() {
    let events = strict("<?xml version=\"1.0\"?><a/>");
    assert_eq!(
        events[0],
        Event::ProcessingInstruction(ProcessingInstruction {
            name: "xml".into(),
            body: "version=\"1.0\"".into(),
        })
    );
}

#[test]
fn test_sgml_declaration() {
    let events = strict("<!ELEMENT a 'x>y'><a/>");
    assert_eq!(events[0], Event::SgmlDeclaration("ELEMENT a 'x>y'".into()));
}

// ============================================================================
// Script
// ============================================================================

#[test]
fn test_script_body_is_raw() {
    let events = loose("<script>if (a < b) {}</script>");
    assert!(events.contains(&Event::Script("if (a < b) {}".into())));
    assert_eq!(close_names(&events), vec!["SCRIPT"]);
}

#[test]
fn test_script_ignores_other_close_tags() {
    let events = loose("<script>x</b>y</script>");
    assert!(events.contains(&Event::Script("x</b>y".into())));
    assert_eq!(close_names(&events), vec!["SCRIPT"]);
}

#[test]
fn test_script_not_captured_in_strict_or_noscript() {
    let events = strict("<script>a</script>");
    assert_eq!(joined_text(&events), "a");

    let events = parse_events("<script>a</script>", ParserOptions::loose().noscript(true));
    assert_eq!(joined_text(&events), "a");
    assert!(!events.iter().any(|e| matches!(e, Event::Script(_))));
}

// ============================================================================
// Namespaces
// ============================================================================

fn xmlns() -> ParserOptions {
    ParserOptions::strict().xmlns(true)
}

#[test]
fn test_prefixed_element_resolves() {
    let events = parse_events("<a xmlns:p=\"urn:x\"><p:b/></a>", xmlns());
    assert!(error_messages(&events).is_empty());

    let qualified = open_tag(&events, "p:b").qualified.clone().unwrap();
    assert_eq!(qualified.prefix, "p");
    assert_eq!(qualified.local, "b");
    assert_eq!(qualified.uri, "urn:x");

    let binding = NamespaceBinding {
        prefix: "p".into(),
        uri: "urn:x".into(),
    };
    assert_eq!(events[0], Event::OpenNamespace(binding.clone()));
    assert_eq!(events[events.len() - 2], Event::CloseNamespace(binding));
}

#[test]
fn test_namespace_scope_ends_with_element() {
    let events = parse_events("<r><a xmlns:p=\"urn:x\"/><p:c/></r>", xmlns());
    let errors: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            Event::Error(err) => Some(err),
            _ => None,
        })
        .collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, ErrorKind::Namespace);
    assert_eq!(errors[0].message, "Unbound namespace prefix: \"p:c\"");

    // an unbound prefix resolves to itself
    let qualified = open_tag(&events, "p:c").qualified.clone().unwrap();
    assert_eq!(qualified.uri, "p");
}

#[test]
fn test_default_namespace() {
    let events = parse_events("<a xmlns=\"urn:d\" id=\"1\"><b/></a>", xmlns());
    let b = open_tag(&events, "b").qualified.clone().unwrap();
    assert_eq!(b.uri, "urn:d");
    assert_eq!(b.prefix, "");

    // unprefixed attributes stay out of the default namespace
    let a = open_tag(&events, "a");
    let id = a.attributes.iter().find(|attr| attr.name == "id").unwrap();
    assert_eq!(id.qualified.as_ref().unwrap().uri, "");
    let decl = a.attributes.iter().find(|attr| attr.name == "xmlns").unwrap();
    assert_eq!(decl.qualified.as_ref().unwrap().uri, core_ns::XMLNS);
}

#[test]
fn test_shadowed_prefix() {
    let doc = "<a xmlns:p=\"urn:1\"><b xmlns:p=\"urn:2\"><p:x/></b><p:y/></a>";
    let events = parse_events(doc, xmlns());
    assert_eq!(open_tag(&events, "p:x").qualified.as_ref().unwrap().uri, "urn:2");
    assert_eq!(open_tag(&events, "p:y").qualified.as_ref().unwrap().uri, "urn:1");
}

#[test]
fn test_xml_prefix_rebinding_rejected() {
    let events = parse_events("<a xmlns:xml=\"urn:wrong\"/>", xmlns());
    let errors = error_messages(&events);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].starts_with("xml: prefix must be bound to"));

    let events = parse_events("<a xml:lang=\"en\"/>", xmlns());
    assert!(error_messages(&events).is_empty());
    let lang = &open_tag(&events, "a").attributes[0];
    assert_eq!(lang.qualified.as_ref().unwrap().uri, core_ns::XML);
}

// ============================================================================
// Buffer guard
// ============================================================================

#[test]
fn test_long_text_is_split() {
    let body = "x".repeat(100);
    let doc = format!("<a>{body}</a>");
    let opts = ParserOptions::strict().max_buffer_length(Some(16));
    let events = parse_events(&doc, opts.clone());

    assert!(error_messages(&events).is_empty());
    assert_eq!(joined_text(&events), body);
    let pieces: Vec<_> = events.iter().filter(|e| e.is_text()).collect();
    assert!(pieces.len() > 1);
    assert!(events.iter().all(|e| match e {
        Event::Text(t) => t.len() <= 16,
        _ => true,
    }));

    // the same split happens when the input arrives one char at a time
    let mut parser = Parser::new(opts, EventCollector::new());
    for c in doc.chars() {
        parser.write(c.encode_utf8(&mut [0; 4])).unwrap();
    }
    parser.end();
    assert_eq!(parser.into_handler().take_events(), events);
}

#[test]
fn test_multibyte_text_stays_under_limit() {
    let body = "é".repeat(50);
    let doc = format!("<a>{body}</a>");
    let events = parse_events(&doc, ParserOptions::strict().max_buffer_length(Some(16)));
    assert_eq!(joined_text(&events), body);
    assert!(events.iter().all(|e| match e {
        Event::Text(t) => t.len() <= 16,
        _ => true,
    }));
}

#[test]
fn test_long_cdata_is_split() {
    let body = "c".repeat(50);
    let doc = format!("<a><![CDATA[{body}]]></a>");
    let events = parse_events(&doc, ParserOptions::strict().max_buffer_length(Some(16)));
    let data: String = events
        .iter()
        .filter_map(|e| match e {
            Event::CData(d) => Some(d.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(data, body);
    assert_eq!(events.iter().filter(|e| **e == Event::OpenCData).count(), 1);
    assert_eq!(events.iter().filter(|e| **e == Event::CloseCData).count(), 1);
}

#[test]
fn test_oversized_attribute_value() {
    let value = "v".repeat(40);
    let doc = format!("<a foo=\"{value}\"/>");
    let opts = ParserOptions::strict().max_buffer_length(Some(16));
    let events = parse_events(&doc, opts);

    let errors: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            Event::Error(err) => Some(err),
            _ => None,
        })
        .collect();
    assert!(!errors.is_empty());
    assert!(errors.iter().all(|err| err.kind == ErrorKind::BufferOverrun));
    assert_eq!(errors[0].message, "Max buffer length exceeded: attribValue");
    // the value is still delivered whole
    assert_eq!(open_tag(&events, "a").attribute("foo"), Some(value.as_str()));

    // loose mode does not report it
    let events = parse_events(&doc, ParserOptions::loose().max_buffer_length(Some(16)));
    assert!(error_messages(&events).is_empty());
}

fn longest_text(events: &[Event]) -> usize {
    events
        .iter()
        .filter_map(|e| match e {
            Event::Text(t) => Some(t.len()),
            _ => None,
        })
        .max()
        .unwrap_or(0)
}

#[test]
fn test_oversized_close_tag_name_becomes_bounded_text() {
    let name = "a".repeat(1000);
    let doc = format!("<r></{name}><b/></r>");
    let events = parse_events(&doc, ParserOptions::loose().max_buffer_length(Some(100)));

    assert!(longest_text(&events) <= 100);
    assert_eq!(joined_text(&events), format!("</{name}>"));
    assert_eq!(close_names(&events), vec!["B", "R"]);
}

#[test]
fn test_oversized_entity_becomes_bounded_text() {
    let name = "a".repeat(1000);
    let doc = format!("<r>&{name};<b/></r>");

    let events = parse_events(&doc, ParserOptions::loose().max_buffer_length(Some(100)));
    assert!(longest_text(&events) <= 100);
    assert_eq!(joined_text(&events), format!("&{name};"));

    // an entity cut short by a non-entity character takes the same path
    let doc = format!("<r>&{name} <b/></r>");
    let events = parse_events(&doc, ParserOptions::loose().max_buffer_length(Some(100)));
    assert!(longest_text(&events) <= 100);
    assert_eq!(joined_text(&events), format!("&{name} "));
}

#[test]
fn test_long_entity_expansion_is_bounded() {
    let mut parser = Parser::new(
        ParserOptions::strict().max_buffer_length(Some(16)),
        EventCollector::new(),
    );
    parser.define_entity("big", "z".repeat(90));
    parser.write("<a>&big;&big;</a>").unwrap();
    parser.end();
    let events = parser.into_handler().take_events();
    assert!(longest_text(&events) <= 16);
    assert_eq!(joined_text(&events), "z".repeat(180));
}

#[test]
fn test_guard_disabled() {
    let body = "x".repeat(70_000);
    let doc = format!("<a>{body}</a>");
    let events = parse_events(&doc, ParserOptions::strict().max_buffer_length(None));
    assert_eq!(events[1], Event::Text(body));
}

// ============================================================================
// Lifecycle
// ============================================================================

#[test]
fn test_error_positions() {
    let events = strict("<a>\n  <b></c></b></a>");
    let err = events
        .iter()
        .find_map(|e| match e {
            Event::Error(err) => Some(err),
            _ => None,
        })
        .unwrap();
    assert_eq!(err.message, "Unexpected close tag");
    assert_eq!((err.line, err.column, err.position), (2, 9, 13));
}

#[test]
fn test_write_after_end_is_refused() {
    let mut parser = Parser::new(ParserOptions::strict(), EventCollector::new());
    parser.write("<a/>").unwrap();
    parser.end();
    assert!(parser.is_closed());
    assert_eq!(parser.write("<b/>"), Err(Error::Closed));
    assert_eq!(parser.close(), Err(Error::Closed));

    parser.reset();
    assert!(parser.write("<b/>").is_ok());
}

#[test]
fn test_pending_error_blocks_until_resume() {
    let mut parser = Parser::new(ParserOptions::strict(), EventCollector::new());
    // the chunk that raises the error is still consumed
    assert!(parser.write("<a>&bogus;").is_ok());

    match parser.write("</a>") {
        Err(Error::Unresumed(err)) => assert_eq!(err.kind, ErrorKind::InvalidEntity),
        other => panic!("expected unresumed error, got {other:?}"),
    }
    assert!(parser.close().is_err());

    parser.resume();
    parser.write("</a>").unwrap();
    parser.close().unwrap();
    let events = parser.into_handler().take_events();
    assert_eq!(close_names(&events), vec!["a"]);
    assert_eq!(events.last(), Some(&Event::End));
}

#[test]
fn test_loose_mode_never_errors() {
    let mut parser = Parser::new(ParserOptions::loose(), EventCollector::new());
    parser.write("x</y><a b=c <<  &zz; <!-- - -- ->").unwrap();
    parser.write("<more/>").unwrap();
    parser.close().unwrap();
    assert!(parser.handler().errors().next().is_none());
}

#[test]
fn test_reset_starts_a_fresh_document() {
    let mut parser = Parser::new(ParserOptions::strict(), EventCollector::with_ready());
    parser.write("<a><b>").unwrap();
    parser.reset();
    assert_eq!(parser.depth(), 0);
    assert_eq!(parser.position(), 0);

    let before = parser.handler_mut().take_events();
    assert_eq!(before.last(), Some(&Event::Ready));

    parser.write("<c/>").unwrap();
    parser.end();
    let events = parser.into_handler().take_events();
    let mut c = Tag::new("c");
    c.self_closing = true;
    assert_eq!(
        events,
        vec![Event::OpenTag(c), Event::CloseTag("c".into()), Event::End]
    );
}

#[test]
fn test_flush_emits_pending_text() {
    let mut parser = Parser::new(ParserOptions::loose(), EventCollector::new());
    parser.write("<a>partial").unwrap();
    assert_eq!(parser.handler().event_count(), 1);
    parser.flush();
    assert_eq!(
        parser.handler().events().last(),
        Some(&Event::Text("partial".into()))
    );
}

#[test]
fn test_handler_by_reference() {
    let mut collector = EventCollector::new();
    {
        let mut parser = Parser::new(ParserOptions::strict(), &mut collector);
        parser.write("<a/>").unwrap();
        parser.end();
    }
    assert_eq!(collector.event_count(), 3);
}

// ============================================================================
// Chunking
// ============================================================================

const STRICT_DOC: &str = "<?xml version=\"1.0\"?><!DOCTYPE r><r a=\"1&amp;2\" b='x'>\
    héllo &lt;wörld&gt; &bogus; <![CDATA[c]]d]]><!-- note --><x/>tail</q></r >";

const LOOSE_DOC: &str = "<div class=x><script>a<b</script><p>one &nbsp; <p>two</div>\u{1F600}";

#[quickcheck]
fn prop_strict_chunking_is_invisible(cuts: Vec<u8>) -> bool {
    let opts = ParserOptions::strict().max_buffer_length(Some(12));
    write_in_chunks(STRICT_DOC, &cuts, opts.clone()) == parse_events(STRICT_DOC, opts)
}

#[quickcheck]
fn prop_loose_chunking_is_invisible(cuts: Vec<u8>) -> bool {
    let opts = ParserOptions::loose().xmlns(true).max_buffer_length(Some(10));
    write_in_chunks(LOOSE_DOC, &cuts, opts.clone()) == parse_events(LOOSE_DOC, opts)
}

#[quickcheck]
fn prop_loose_elements_balance(input: String) -> bool {
    let events = loose(&input);
    let opens = events.iter().filter(|e| e.is_open_tag()).count();
    let closes = events.iter().filter(|e| e.is_close_tag()).count();
    opens == closes && events.last() == Some(&Event::End)
}

#[quickcheck]
fn prop_strict_input_never_panics(input: String) -> bool {
    let events = parse_events(&input, ParserOptions::strict().xmlns(true));
    events.last() == Some(&Event::End)
}
