//! A mnemonic-per-method extension of [`ProgramBuilder`], so a caller writes
//! `.lda(Arg::Immediate(Byte(0x01)))` instead of
//! `.instruction("lda", Arg::Immediate(Byte(0x01)))`.
//!
//! Instructions whose mode is fixed by the mnemonic itself (`jmp`, `jsr`,
//! every conditional branch, every no-operand op) take the narrower operand
//! type directly; instructions available in more than one mode (`lda`,
//! `adc`, `sta`, ...) still take [`Arg`] so the caller picks the mode.

use signal_core::program::{AddressRef, Arg, ProgramBuilder};

/// Mnemonic methods for [`crate::instruction_set::reference_instruction_set`].
pub trait MnemonicBuilderExt: Sized {
    fn hlt(self) -> Self;
    fn nop(self) -> Self;

    fn tax(self) -> Self;
    fn txa(self) -> Self;
    fn tay(self) -> Self;
    fn tya(self) -> Self;

    fn sec(self) -> Self;
    fn clc(self) -> Self;

    fn lda(self, arg: Arg) -> Self;
    fn ldx(self, arg: Arg) -> Self;
    fn ldy(self, arg: Arg) -> Self;
    fn sta(self, arg: Arg) -> Self;
    fn stx(self, arg: Arg) -> Self;
    fn sty(self, arg: Arg) -> Self;

    fn adc(self, arg: Arg) -> Self;
    fn sbc(self, arg: Arg) -> Self;
    fn and(self, arg: Arg) -> Self;
    fn ora(self, arg: Arg) -> Self;
    fn eor(self, arg: Arg) -> Self;
    fn cmp(self, arg: Arg) -> Self;

    fn asl(self) -> Self;
    fn lsr(self) -> Self;
    fn rol(self) -> Self;
    fn ror(self) -> Self;

    fn inc(self) -> Self;
    fn dec(self) -> Self;
    fn inx(self) -> Self;
    fn dex(self) -> Self;
    fn iny(self) -> Self;
    fn dey(self) -> Self;

    fn jmp(self, target: AddressRef) -> Self;
    fn jsr(self, target: AddressRef) -> Self;
    fn rts(self) -> Self;

    fn pha(self) -> Self;
    fn pla(self) -> Self;
    fn php(self) -> Self;
    fn plp(self) -> Self;

    fn beq(self, target: AddressRef) -> Self;
    fn bne(self, target: AddressRef) -> Self;
    fn bmi(self, target: AddressRef) -> Self;
    fn bpl(self, target: AddressRef) -> Self;
    fn bcs(self, target: AddressRef) -> Self;
    fn bcc(self, target: AddressRef) -> Self;
    fn bvs(self, target: AddressRef) -> Self;
    fn bvc(self, target: AddressRef) -> Self;
}

macro_rules! no_operand {
    ($name:ident, $mnemonic:literal) => {
        fn $name(self) -> Self {
            self.instruction($mnemonic, Arg::None)
        }
    };
}

macro_rules! with_arg {
    ($name:ident, $mnemonic:literal) => {
        fn $name(self, arg: Arg) -> Self {
            self.instruction($mnemonic, arg)
        }
    };
}

macro_rules! branch {
    ($name:ident, $mnemonic:literal) => {
        fn $name(self, target: AddressRef) -> Self {
            self.instruction($mnemonic, Arg::Relative(target))
        }
    };
}

impl MnemonicBuilderExt for ProgramBuilder {
    no_operand!(hlt, "hlt");
    no_operand!(nop, "nop");

    no_operand!(tax, "tax");
    no_operand!(txa, "txa");
    no_operand!(tay, "tay");
    no_operand!(tya, "tya");

    no_operand!(sec, "sec");
    no_operand!(clc, "clc");

    with_arg!(lda, "lda");
    with_arg!(ldx, "ldx");
    with_arg!(ldy, "ldy");
    with_arg!(sta, "sta");
    with_arg!(stx, "stx");
    with_arg!(sty, "sty");

    with_arg!(adc, "adc");
    with_arg!(sbc, "sbc");
    with_arg!(and, "and");
    with_arg!(ora, "ora");
    with_arg!(eor, "eor");
    with_arg!(cmp, "cmp");

    no_operand!(asl, "asl");
    no_operand!(lsr, "lsr");
    no_operand!(rol, "rol");
    no_operand!(ror, "ror");

    no_operand!(inc, "inc");
    no_operand!(dec, "dec");
    no_operand!(inx, "inx");
    no_operand!(dex, "dex");
    no_operand!(iny, "iny");
    no_operand!(dey, "dey");

    fn jmp(self, target: AddressRef) -> Self {
        self.instruction("jmp", Arg::Absolute(target))
    }
    fn jsr(self, target: AddressRef) -> Self {
        self.instruction("jsr", Arg::Absolute(target))
    }
    no_operand!(rts, "rts");

    no_operand!(pha, "pha");
    no_operand!(pla, "pla");
    no_operand!(php, "php");
    no_operand!(plp, "plp");

    branch!(beq, "beq");
    branch!(bne, "bne");
    branch!(bmi, "bmi");
    branch!(bpl, "bpl");
    branch!(bcs, "bcs");
    branch!(bcc, "bcc");
    branch!(bvs, "bvs");
    branch!(bvc, "bvc");
}
