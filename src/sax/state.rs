//! Parser states
//!
//! Multi-character delimiters (`-->`, `]]>`, `?>`, `<![CDATA[`) are modelled
//! as chains of single-character states.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum State {
    /// Before the first `<`; leading whitespace is skipped
    Begin,
    /// General character data
    Text,
    /// `&amp` and such
    TextEntity,
    /// `<`
    OpenWaka,
    /// `<!BLARG`
    SgmlDecl,
    /// `<!BLARG foo "bar`
    SgmlDeclQuoted,
    /// `<!DOCTYPE`
    Doctype,
    /// `<!DOCTYPE "//blah`
    DoctypeQuoted,
    /// `<!DOCTYPE "//blah" [ ...`
    DoctypeDtd,
    /// `<!DOCTYPE "//blah" [ "foo`
    DoctypeDtdQuoted,
    /// `<!-`
    CommentStarting,
    /// `<!--`
    Comment,
    /// `<!-- blah -`
    CommentEnding,
    /// `<!-- blah --`
    CommentEnded,
    /// `<![CDATA[ something`
    Cdata,
    /// `]`
    CdataEnding,
    /// `]]`
    CdataEnding2,
    /// `<?hi`
    ProcInst,
    /// `<?hi there`
    ProcInstBody,
    /// `<?hi "there" ?`
    ProcInstEnding,
    /// `<strong`
    OpenTag,
    /// `<strong /`
    OpenTagSlash,
    /// `<a`
    Attrib,
    /// `<a foo`
    AttribName,
    /// `<a foo _`
    AttribNameSawWhite,
    /// `<a foo=`
    AttribValue,
    /// `<a foo="bar`
    AttribValueQuoted,
    /// `<a foo="bar"`
    AttribValueClosed,
    /// `<a foo=bar`
    AttribValueUnquoted,
    /// `<foo bar="&quot;"`
    AttribValueEntityQ,
    /// `<foo bar=&quot;`
    AttribValueEntityU,
    /// `</a`
    CloseTag,
    /// `</a   >`
    CloseTagSawWhite,
    /// `<script> ...`
    Script,
    /// `<script> ... <`
    ScriptEnding,
}

impl State {
    /// States in which `end()` is not an "Unexpected end"
    #[inline]
    pub fn is_resting(self) -> bool {
        matches!(self, State::Begin | State::Text)
    }
}
