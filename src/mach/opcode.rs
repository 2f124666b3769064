/// ## Script instruction set
///
/// Every opcode either evaluates a condition (clearing the line's
/// condition flag when it fails) or performs an action. Numbering is a
/// property of the game variant; see `schema`.
///
/// For example: `IF VAR(3) == 5 THEN PLACE(LAMP, PLAYER)` is the line
/// `Eq 3 5; Place LAMP -5` followed by the end marker.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
    // *** Item conditions
    /// Player's parent is the item.
    At,
    NotAt,
    /// Item's parent is the player.
    Carried,
    NotCarried,
    IsAt,
    State,
    Is,
    If1,
    If2,
    IsClass,

    // *** Variable conditions
    Zero,
    NotZero,
    Eq,
    NotEq,
    Gt,
    Lt,
    Eqf,
    NotEqf,
    Ltf,
    Gtf,
    Chance,
    BZero,
    BNotZero,
    IsBox,

    // *** Item actions
    Destroy,
    Place,
    SetState,
    SetClass,
    UnsetClass,
    GetParent,
    GetNext,
    GetChildren,

    // *** Variable actions
    Copyff,
    Clear,
    Let,
    Add,
    Sub,
    Addf,
    Subf,
    Mul,
    Div,
    Mulf,
    Divf,
    Mod,
    Modf,
    Random,
    Inc,
    Dec,
    BSet,
    BClear,

    // *** Output
    Print,
    Message,

    // *** Control flow
    End,
    Done,
    Process,
    Rescan,
    DoClass,
    When,
    Unwhen,
    ClearTimers,
    Delay,

    // *** Animation and screen
    HaltAnimation,
    RestartAnimation,
    LoadZone,
    Animate,
    StopAnimate,
    WaitSync,
    Sync,
    Cls,
    Damage,

    // *** Hit areas
    AddBox,
    DelBox,
    EnableBox,
    DisableBox,
    MoveBox,
}

impl std::fmt::Display for Opcode {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use Opcode::*;
        let name = match self {
            At => "AT",
            NotAt => "NOTAT",
            Carried => "CARRIED",
            NotCarried => "NOTCARRIED",
            IsAt => "ISAT",
            State => "STATE",
            Is => "IS",
            If1 => "IF1",
            If2 => "IF2",
            IsClass => "ISCLASS",
            Zero => "ZERO",
            NotZero => "NOTZERO",
            Eq => "EQ",
            NotEq => "NOTEQ",
            Gt => "GT",
            Lt => "LT",
            Eqf => "EQF",
            NotEqf => "NOTEQF",
            Ltf => "LTF",
            Gtf => "GTF",
            Chance => "CHANCE",
            BZero => "BZERO",
            BNotZero => "BNOTZERO",
            IsBox => "ISBOX",
            Destroy => "DESTROY",
            Place => "PLACE",
            SetState => "SETSTATE",
            SetClass => "SETCLASS",
            UnsetClass => "UNSETCLASS",
            GetParent => "GETPARENT",
            GetNext => "GETNEXT",
            GetChildren => "GETCHILDREN",
            Copyff => "COPYFF",
            Clear => "CLEAR",
            Let => "LET",
            Add => "ADD",
            Sub => "SUB",
            Addf => "ADDF",
            Subf => "SUBF",
            Mul => "MUL",
            Div => "DIV",
            Mulf => "MULF",
            Divf => "DIVF",
            Mod => "MOD",
            Modf => "MODF",
            Random => "RANDOM",
            Inc => "INC",
            Dec => "DEC",
            BSet => "BSET",
            BClear => "BCLEAR",
            Print => "PRINT",
            Message => "MESSAGE",
            End => "END",
            Done => "DONE",
            Process => "PROCESS",
            Rescan => "RESCAN",
            DoClass => "DOCLASS",
            When => "WHEN",
            Unwhen => "UNWHEN",
            ClearTimers => "CLEARTIMERS",
            Delay => "DELAY",
            HaltAnimation => "HALTANIMATION",
            RestartAnimation => "RESTARTANIMATION",
            LoadZone => "LOADZONE",
            Animate => "ANIMATE",
            StopAnimate => "STOPANIMATE",
            WaitSync => "WAITSYNC",
            Sync => "SYNC",
            Cls => "CLS",
            Damage => "DAMAGE",
            AddBox => "ADDBOX",
            DelBox => "DELBOX",
            EnableBox => "ENABLEBOX",
            DisableBox => "DISABLEBOX",
            MoveBox => "MOVEBOX",
        };
        write!(f, "{}", name)
    }
}
