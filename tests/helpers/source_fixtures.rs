//! Common TypeScript sources for tests.

/// `Order` → `Status` (same file) → `Code` (enum, imported).
pub const ORDER_A: &str = r#"
import { Code } from "./b";

export type Status = { code: Code; note?: string };

/** @schema */
export interface Order {
    id: string;
    status: Status;
}
"#;

pub const CODE_B: &str = r#"
export enum Code {
    Open = "open",
    Closed = "closed",
}
"#;

pub const SAME_FILE_CYCLE: &str = r#"
/** @schema */
export type A = { b: B };
export type B = { a: A };
"#;

pub const CROSS_FILE_CYCLE_A: &str = r#"
import { B } from "./b";
/** @schema */
export interface A { b: B }
"#;

pub const CROSS_FILE_CYCLE_B: &str = r#"
import { A } from "./a";
export interface B { a?: A }
"#;

/// Two wildcard re-exports, only the second supplies `Foo`.
pub const WILDCARD_INDEX: &str = r#"
export * from "./first";
export * from "./second";
"#;

pub const WILDCARD_CONSUMER: &str = r#"
import { Foo } from "./index";
/** @schema */
export type Entry = { foo: Foo };
"#;
