//! Declarations every session starts with: the global interfaces behind
//! array literals, primitives' apparent types and object members.

use std::sync::Arc;

use tyck_ast::SyntaxTree;
use tyck_core::intern::StringInterner;

pub const LIB_FILE_NAME: &str = "lib.d.ts";

const LIB_SOURCE: &str = r#"
interface Object {
    toString(): string;
    valueOf(): Object;
    hasOwnProperty(v: string): boolean;
}
declare var Object: {
    new (value?: any): Object;
    (value?: any): any;
    keys(o: object): string[];
};

interface Function {
    apply(thisArg: any, argArray?: any): any;
    call(thisArg: any, ...argArray: any[]): any;
    bind(thisArg: any, ...argArray: any[]): any;
    readonly length: number;
    readonly name: string;
}

interface IArguments {
    readonly length: number;
    [index: number]: any;
}

interface String {
    readonly length: number;
    [index: number]: string;
    charAt(pos: number): string;
    charCodeAt(index: number): number;
    indexOf(searchString: string, position?: number): number;
    includes(searchString: string, position?: number): boolean;
    startsWith(searchString: string, position?: number): boolean;
    endsWith(searchString: string, endPosition?: number): boolean;
    slice(start?: number, end?: number): string;
    substring(start: number, end?: number): string;
    split(separator: string, limit?: number): string[];
    toUpperCase(): string;
    toLowerCase(): string;
    trim(): string;
    concat(...strings: string[]): string;
}
declare var String: {
    (value?: any): string;
    fromCharCode(...codes: number[]): string;
};

interface Number {
    toFixed(fractionDigits?: number): string;
    toString(radix?: number): string;
    valueOf(): number;
}
declare var Number: {
    (value?: any): number;
    isInteger(value: unknown): boolean;
    isNaN(value: unknown): boolean;
};

interface Boolean {
    valueOf(): boolean;
}
declare var Boolean: {
    (value?: any): boolean;
};

interface Symbol {
    readonly description: string | undefined;
    toString(): string;
}

interface BigInt {
    toString(radix?: number): string;
}

interface RegExp {
    test(string: string): boolean;
    readonly source: string;
}

interface Error {
    name: string;
    message: string;
}
declare var Error: {
    new (message?: string): Error;
    (message?: string): Error;
};

interface ReadonlyArray<T> {
    readonly length: number;
    readonly [n: number]: T;
    indexOf(searchElement: T, fromIndex?: number): number;
    includes(searchElement: T, fromIndex?: number): boolean;
    join(separator?: string): string;
    slice(start?: number, end?: number): T[];
    concat(...items: T[][]): T[];
    map<U>(callbackfn: (value: T, index: number, array: readonly T[]) => U): U[];
    filter(predicate: (value: T, index: number, array: readonly T[]) => unknown): T[];
    forEach(callbackfn: (value: T, index: number, array: readonly T[]) => void): void;
    some(predicate: (value: T, index: number, array: readonly T[]) => unknown): boolean;
    every(predicate: (value: T, index: number, array: readonly T[]) => unknown): boolean;
    find(predicate: (value: T, index: number, array: readonly T[]) => unknown): T | undefined;
    reduce<U>(callbackfn: (previousValue: U, currentValue: T, currentIndex: number) => U, initialValue: U): U;
}

interface Array<T> {
    length: number;
    [n: number]: T;
    push(...items: T[]): number;
    pop(): T | undefined;
    shift(): T | undefined;
    unshift(...items: T[]): number;
    indexOf(searchElement: T, fromIndex?: number): number;
    includes(searchElement: T, fromIndex?: number): boolean;
    join(separator?: string): string;
    reverse(): T[];
    slice(start?: number, end?: number): T[];
    splice(start: number, deleteCount?: number): T[];
    concat(...items: T[][]): T[];
    map<U>(callbackfn: (value: T, index: number, array: T[]) => U): U[];
    filter(predicate: (value: T, index: number, array: T[]) => unknown): T[];
    forEach(callbackfn: (value: T, index: number, array: T[]) => void): void;
    some(predicate: (value: T, index: number, array: T[]) => unknown): boolean;
    every(predicate: (value: T, index: number, array: T[]) => unknown): boolean;
    find(predicate: (value: T, index: number, array: T[]) => unknown): T | undefined;
    reduce<U>(callbackfn: (previousValue: U, currentValue: T, currentIndex: number) => U, initialValue: U): U;
}
declare var Array: {
    new <T>(...items: T[]): T[];
    <T>(...items: T[]): T[];
    isArray(arg: any): arg is any[];
};

declare var Math: {
    readonly PI: number;
    abs(x: number): number;
    floor(x: number): number;
    ceil(x: number): number;
    round(x: number): number;
    max(...values: number[]): number;
    min(...values: number[]): number;
    random(): number;
};

declare var JSON: {
    parse(text: string): any;
    stringify(value: any): string;
};

declare var console: {
    log(...data: any[]): void;
    warn(...data: any[]): void;
    error(...data: any[]): void;
};

declare var NaN: number;
declare var Infinity: number;
declare function parseInt(string: string, radix?: number): number;
declare function parseFloat(string: string): number;
declare function isNaN(number: number): boolean;
"#;

/// Parse the built-in declarations with the session's interner.
pub fn parse_lib(interner: &StringInterner) -> Arc<SyntaxTree> {
    tyck_parser::parse_source(LIB_FILE_NAME, LIB_SOURCE, interner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lib_parses_cleanly() {
        let interner = StringInterner::new();
        let tree = parse_lib(&interner);
        assert!(tree.parse_diagnostics().is_empty(), "{:?}", tree.parse_diagnostics());
        assert!(tree.is_declaration_file());
    }
}
